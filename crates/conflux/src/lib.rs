//! Embeddable event correlation for Rust services.
//!
//! Provides a unified API over the Conflux subsystems. This is the main
//! entry point for applications embedding Conflux: assemble a [`Pipeline`]
//! out of the stock handlers, or implement [`Handler`] for your own stages,
//! and feed it messages from wherever your events arrive.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use conflux::{Cache, EventStore, InMemoryEventStore, Joiner, MatchAll, Pipeline};
//!
//! let store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
//! let pipeline = Pipeline::new()
//!     .with_handler(Cache::new(Arc::clone(&store)))
//!     .with_handler(Joiner::new(MatchAll::new(["payment", "fraud"]), store));
//! assert_eq!(pipeline.len(), 2);
//! ```

// Re-export key types
pub use conflux_types::{Context, Message};

pub use conflux_pipeline::{
    BoxError, CallNext, DeadlineExceeded, Handler, Pipeline, StagePanicked,
};

pub use conflux_store::{EventStore, InMemoryEventStore, StoreError, StoreResult};

pub use conflux_handlers::{
    And, Cache, ConflictResolver, Condition, EraseContentFromSources, Identity, Joiner,
    KeyExtractor, MatchAll, MatchAny, MatchNone, MessageKey, Or, RenameSources, Rule,
    SkipOnConflict, SourceSet, TransformError, Transformer, Xor, COMPOSED_SOURCE,
};

pub use conflux_blob::{
    BlobClient, BlobEventStore, BlobStoreConfig, FsBlobClient, MemoryBlobClient, ObjectMeta,
    Operation, OperationTimeouts, ReadPolicy, TakeFirstCreated, TakeLastCreated,
};

pub use conflux_compress::{CompressError, CompressResult, Compressor, Noop, Zstd};
