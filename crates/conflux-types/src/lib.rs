//! Foundation types for Conflux.
//!
//! This crate provides the message and context types used throughout the
//! Conflux pipeline. Every other Conflux crate depends on `conflux-types`.
//!
//! # Key Types
//!
//! - [`Message`] — An event flowing through the pipeline: key, source, content
//! - [`Context`] — Deadline carrier threaded through every async call

pub mod context;
pub mod message;

pub use context::Context;
pub use message::Message;
