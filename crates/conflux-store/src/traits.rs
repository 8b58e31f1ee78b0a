use async_trait::async_trait;
use conflux_types::{Context, Message};

use crate::error::StoreResult;

/// Keyed event storage.
///
/// The store models a two-level namespace: a correlation `key` groups the
/// events that belong together, and within a key each `source` owns one
/// slot. All implementations must satisfy these invariants:
/// - `persist` logically overwrites the slot: a later `look_up` on the same
///   `(key, source)` returns content from some single persisted version,
///   never a mixture.
/// - Absence is not an error: `look_up` returns `Ok(None)` and the listing
///   operations return empty vectors for unknown keys.
/// - Concurrent use from multiple tasks is safe.
/// - Backend failures are propagated, never silently ignored.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Store `content` under the `(key, source)` slot.
    async fn persist(
        &self,
        ctx: &Context,
        key: &str,
        source: &str,
        content: &str,
    ) -> StoreResult<()>;

    /// Fetch the message in the `(key, source)` slot, if any.
    async fn look_up(&self, ctx: &Context, key: &str, source: &str)
        -> StoreResult<Option<Message>>;

    /// Fetch every message stored under `key`, one per source.
    async fn look_up_by_key(&self, ctx: &Context, key: &str) -> StoreResult<Vec<Message>>;

    /// The distinct sources that have persisted under `key`.
    async fn list_sources_by_key(&self, ctx: &Context, key: &str) -> StoreResult<Vec<String>>;
}
