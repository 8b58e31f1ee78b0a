//! Blob-backed event store.
//!
//! Persists each event as an immutable blob object under a slot path,
//! `[folder/]key/source/`, with the object named by the URL-safe base64 of
//! the SHA-256 digest of its compressed content. Writers therefore never
//! overwrite each other: two concurrent persists to the same slot land as
//! two distinct objects, and a [`ReadPolicy`] decides which one a reader
//! sees.
//!
//! The store talks to blob storage through the [`BlobClient`] capability.
//! Bucket selection, credentials, and retry behavior belong to the client
//! implementation; this crate ships [`MemoryBlobClient`] for tests and
//! embedding and [`FsBlobClient`] for a local directory tree.
//!
//! Every storage operation is bounded by a per-operation timeout
//! ([`OperationTimeouts`]) and by the ambient [`conflux_types::Context`]
//! deadline, whichever is sooner.

pub mod client;
pub mod config;
pub mod fs;
pub mod memory;
pub mod path;
pub mod policy;
pub mod store;

pub use client::{BlobClient, ObjectMeta};
pub use config::{BlobStoreConfig, Operation, OperationTimeouts};
pub use fs::FsBlobClient;
pub use memory::MemoryBlobClient;
pub use policy::{ReadPolicy, TakeFirstCreated, TakeLastCreated};
pub use store::BlobEventStore;
