//! Pipeline executor for Conflux.
//!
//! A [`Pipeline`] runs a message through an ordered chain of [`Handler`]s.
//! Each handler receives the message and a one-shot [`CallNext`] capability
//! for the rest of the chain; forwarding is optional, so a handler can
//! swallow a message (deduplication) or hold it back (incomplete join) by
//! simply not calling next.
//!
//! Every stage races against the ambient [`conflux_types::Context`]
//! deadline. When the deadline elapses mid-stage the pipeline returns
//! [`DeadlineExceeded`] immediately; the stage's task is left running and
//! must observe the context itself to stop early.

pub mod error;
pub mod handler;
pub mod pipeline;

pub use error::{BoxError, DeadlineExceeded, StagePanicked};
pub use handler::{CallNext, Handler};
pub use pipeline::Pipeline;
