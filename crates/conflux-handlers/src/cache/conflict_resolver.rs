use async_trait::async_trait;

use conflux_pipeline::{BoxError, CallNext};
use conflux_types::{Context, Message};

/// Decides what happens when an incoming message collides with one already
/// in the cache.
///
/// The resolver is handed the stored message, not the incoming one, along
/// with the rest of the chain. It may drop the event, forward the stored
/// copy, or do anything else a handler could.
#[async_trait]
pub trait ConflictResolver: Send + Sync {
    async fn resolve(
        &self,
        ctx: &Context,
        stored: Message,
        next: CallNext,
    ) -> Result<(), BoxError>;
}

/// The default resolver: swallow the duplicate and halt the chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkipOnConflict;

#[async_trait]
impl ConflictResolver for SkipOnConflict {
    async fn resolve(
        &self,
        _ctx: &Context,
        _stored: Message,
        _next: CallNext,
    ) -> Result<(), BoxError> {
        Ok(())
    }
}
