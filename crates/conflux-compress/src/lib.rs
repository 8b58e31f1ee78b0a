//! Compression codecs for Conflux blob payloads.
//!
//! The blob-backed event store compresses content before writing and
//! decompresses after reading. Which codec is in use is part of the store's
//! configuration, not of the stored path, so a deployment must keep using
//! the codec it wrote with.
//!
//! Empty input is passed through unchanged in both directions by every
//! codec: an empty payload has nothing to compress, and forcing a frame
//! header onto it would make "no content" round-trip into "some content".

pub mod codec;
pub mod error;

pub use codec::{Compressor, Noop, Zstd};
pub use error::{CompressError, CompressResult};
