//! HTTP ingestion server for Conflux.
//!
//! Accepts wire events on `POST /v1/events`, converts them into pipeline
//! messages, and runs each one through a correlation pipeline under the
//! configured deadline. Ships a stock deduplicate-then-join pipeline for
//! standalone use; embedders can hand [`ConfluxServer::new`] any chain.

pub mod config;
pub mod convert;
pub mod emit;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ServerConfig, StoreConfig};
pub use emit::LogEmitter;
pub use envelope::EventEnvelope;
pub use error::{EnvelopeError, ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::ConfluxServer;
