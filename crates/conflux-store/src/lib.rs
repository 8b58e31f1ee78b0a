//! Event storage for Conflux.
//!
//! An [`EventStore`] keeps the latest content per `(key, source)` slot and
//! answers lookups by slot or by key. The pipeline's cache and joiner stages
//! are written against this capability, so any backend that implements it
//! can hold their state.
//!
//! [`InMemoryEventStore`] is the embedded implementation; `conflux-blob`
//! provides a blob-storage-backed one.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryEventStore;
pub use traits::EventStore;
