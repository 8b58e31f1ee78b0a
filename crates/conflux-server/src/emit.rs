use async_trait::async_trait;
use tracing::info;

use conflux_pipeline::{BoxError, CallNext, Handler};
use conflux_types::{Context, Message};

/// Terminal stage that logs whatever reaches the end of the chain.
///
/// The default pipeline has no delivery target, so composed events surface
/// in the log. Embedders replace this with their own sink handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogEmitter;

#[async_trait]
impl Handler for LogEmitter {
    fn name(&self) -> &str {
        "log-emitter"
    }

    async fn process(
        &self,
        ctx: &Context,
        message: Message,
        next: CallNext,
    ) -> Result<(), BoxError> {
        info!(
            key = %message.key(),
            source = %message.source(),
            content = %message.content(),
            "event emitted"
        );
        next.call(ctx, message).await
    }
}
