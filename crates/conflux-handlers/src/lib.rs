//! Built-in handlers for Conflux pipelines.
//!
//! Event correlation keeps running into the same three chores: dropping
//! events the pipeline has already processed, holding partial fragments
//! until the full picture has arrived, and normalizing messages from
//! sources that never quite agree on names. [`Cache`], [`Joiner`] and
//! [`Transformer`] cover them. All persistence goes through the
//! [`EventStore`](conflux_store::EventStore) abstraction, so the same
//! chain runs against the in-memory store in tests and a blob-backed
//! store in production.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use conflux_handlers::{Cache, Condition, Joiner, MatchAll, MatchAny};
//! use conflux_pipeline::Pipeline;
//! use conflux_store::InMemoryEventStore;
//!
//! let store = Arc::new(InMemoryEventStore::new());
//! let pipeline = Pipeline::new()
//!     .with_handler(Cache::new(store.clone()))
//!     .with_handler(Joiner::new(
//!         MatchAll::new(["checkout"]).and(MatchAny::new(["payment", "fraud"])),
//!         store,
//!     ));
//! assert_eq!(pipeline.len(), 2);
//! ```

pub mod cache;
pub mod joiner;
pub mod transformer;

// Re-exports for convenience.
pub use cache::{Cache, ConflictResolver, KeyExtractor, MessageKey, SkipOnConflict};
pub use joiner::{
    And, Condition, Joiner, MatchAll, MatchAny, MatchNone, Or, SourceSet, Xor, COMPOSED_SOURCE,
};
pub use transformer::{
    EraseContentFromSources, Identity, RenameSources, Rule, TransformError, Transformer,
};
