//! Deduplicates events the pipeline has already seen.

mod conflict_resolver;
mod key_extractor;

pub use conflict_resolver::{ConflictResolver, SkipOnConflict};
pub use key_extractor::{KeyExtractor, MessageKey};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use conflux_pipeline::{BoxError, CallNext, Handler};
use conflux_store::EventStore;
use conflux_types::{Context, Message};

/// A handler that persists every first-seen event and lets a
/// [`ConflictResolver`] decide what to do with repeats.
///
/// An incoming message is looked up under its cache key (derived by the
/// [`KeyExtractor`], the message key by default) and its source. On a miss
/// the message is persisted and forwarded unchanged; on a hit the stored
/// message and the rest of the chain are handed to the resolver. The
/// default [`SkipOnConflict`] resolver drops the duplicate, which turns the
/// cache into an at-most-once filter in front of expensive handlers.
pub struct Cache {
    store: Arc<dyn EventStore>,
    key_extractor: Box<dyn KeyExtractor>,
    conflict_resolver: Box<dyn ConflictResolver>,
}

impl Cache {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            key_extractor: Box::new(MessageKey),
            conflict_resolver: Box::new(SkipOnConflict),
        }
    }

    pub fn with_key_extractor(mut self, key_extractor: impl KeyExtractor + 'static) -> Self {
        self.key_extractor = Box::new(key_extractor);
        self
    }

    pub fn with_conflict_resolver(
        mut self,
        conflict_resolver: impl ConflictResolver + 'static,
    ) -> Self {
        self.conflict_resolver = Box::new(conflict_resolver);
        self
    }
}

#[async_trait]
impl Handler for Cache {
    fn name(&self) -> &str {
        "cache"
    }

    async fn process(
        &self,
        ctx: &Context,
        message: Message,
        next: CallNext,
    ) -> Result<(), BoxError> {
        let key = message.key().to_owned();
        let source = message.source().to_owned();

        let cache_key = match self.key_extractor.extract(&message) {
            Ok(cache_key) => cache_key,
            Err(error) => {
                error!(%key, %source, %error, "failed to extract cache key");
                return Err(error);
            }
        };

        let stored = match self.store.look_up(ctx, &cache_key, &source).await {
            Ok(stored) => stored,
            Err(error) => {
                error!(%key, %source, %cache_key, %error, "failed to look up message");
                return Err(error.into());
            }
        };
        if let Some(stored) = stored {
            info!(%key, %source, %cache_key, "cache hit");
            return self.conflict_resolver.resolve(ctx, stored, next).await;
        }

        if let Err(error) = self
            .store
            .persist(ctx, &cache_key, &source, message.content())
            .await
        {
            error!(%key, %source, %cache_key, %error, "failed to persist message");
            return Err(error.into());
        }
        debug!(%key, %source, %cache_key, "cache not hit");

        next.call(ctx, message).await
    }
}
