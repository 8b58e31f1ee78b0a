//! Holds event fragments until enough sources have arrived, then emits one
//! composed event.

mod condition;
mod content;

pub use condition::{And, Condition, MatchAll, MatchAny, MatchNone, Or, SourceSet, Xor};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use conflux_pipeline::{BoxError, CallNext, Handler};
use conflux_store::EventStore;
use conflux_types::{Context, Message};

/// Source name carried by every composed event.
pub const COMPOSED_SOURCE: &str = "composed-event";

/// A handler that correlates events sharing a key.
///
/// Every incoming fragment is persisted under its key and source, then the
/// [`Condition`] is evaluated against the set of sources seen so far for
/// that key. While the condition does not hold the chain halts silently;
/// once it holds, the fragments are composed into a single JSON object
/// keyed by source and forwarded as a new message with the source
/// [`COMPOSED_SOURCE`]. A fragment arriving after a composition re-fires
/// it, so downstream handlers may see more than one composed event per key.
pub struct Joiner {
    condition: Box<dyn Condition>,
    store: Arc<dyn EventStore>,
}

impl Joiner {
    pub fn new(condition: impl Condition + 'static, store: Arc<dyn EventStore>) -> Self {
        Self {
            condition: Box::new(condition),
            store,
        }
    }
}

#[async_trait]
impl Handler for Joiner {
    fn name(&self) -> &str {
        "joiner"
    }

    async fn process(
        &self,
        ctx: &Context,
        message: Message,
        next: CallNext,
    ) -> Result<(), BoxError> {
        let key = message.key();
        let source = message.source();

        if let Err(error) = self
            .store
            .persist(ctx, key, source, message.content())
            .await
        {
            error!(key, source, %error, "failed to persist message");
            return Err(error.into());
        }

        let fragments = match self.store.look_up_by_key(ctx, key).await {
            Ok(fragments) => fragments,
            Err(error) => {
                error!(key, source, %error, "failed to look up messages by key");
                return Err(error.into());
            }
        };

        let sources: SourceSet = fragments
            .iter()
            .map(|fragment| fragment.source().to_owned())
            .collect();
        if !self.condition.evaluate(&sources) {
            debug!(key, source, "got message, but condition is not met yet");
            return Ok(());
        }

        let joint_content = match content::compose(&fragments) {
            Ok(joint_content) => joint_content,
            Err(error) => {
                error!(key, source, %error, "failed to serialize joint message");
                return Err(error.into());
            }
        };
        let joint = Message::new(key, COMPOSED_SOURCE, joint_content);
        info!(key, source, "joined message");
        debug!(content = %joint.content(), "joint event");

        next.call(ctx, joint).await
    }
}
