use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use async_trait::async_trait;
use conflux_types::{Context, Message};

use crate::error::BoxError;
use crate::pipeline::run_from;

/// One processing stage.
///
/// A handler may transform the message, persist it, drop it, or emit
/// something else entirely; the chain continues only if the handler invokes
/// `next`. Custom handlers that do asynchronous work should propagate `ctx`
/// into downstream calls so they stop promptly once the deadline passes:
/// the executor stops waiting at the deadline but does not kill the stage.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Stable name used in logs and timeout errors.
    fn name(&self) -> &str;

    async fn process(&self, ctx: &Context, message: Message, next: CallNext)
        -> Result<(), BoxError>;
}

/// One-shot forwarding capability bound to the remaining chain suffix.
///
/// Calling it consumes it, so a handler can forward at most once. The
/// context given here governs every downstream stage; passing a tightened
/// context shortens the budget for the rest of the chain.
pub struct CallNext {
    stages: Arc<[Arc<dyn Handler>]>,
    index: usize,
    deepest_stage: Arc<AtomicUsize>,
}

impl CallNext {
    pub(crate) fn new(
        stages: Arc<[Arc<dyn Handler>]>,
        index: usize,
        deepest_stage: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            stages,
            index,
            deepest_stage,
        }
    }

    /// Run the rest of the chain. A suffix past the final handler is the
    /// terminal no-op and succeeds immediately.
    pub async fn call(self, ctx: &Context, message: Message) -> Result<(), BoxError> {
        run_from(self.stages, self.index, self.deepest_stage, *ctx, message).await
    }
}
