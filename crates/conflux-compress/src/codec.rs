use crate::error::{CompressError, CompressResult};

/// A symmetric compression codec.
///
/// Implementations must be pure with respect to their input: the same bytes
/// always produce output that decompresses back to them. Empty input must
/// come back empty from both directions.
pub trait Compressor: Send + Sync {
    fn compress(&self, input: &[u8]) -> CompressResult<Vec<u8>>;
    fn decompress(&self, input: &[u8]) -> CompressResult<Vec<u8>>;
}

/// Passthrough codec. Useful for tests and for payloads that are already
/// compressed upstream.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

impl Compressor for Noop {
    fn compress(&self, input: &[u8]) -> CompressResult<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn decompress(&self, input: &[u8]) -> CompressResult<Vec<u8>> {
        Ok(input.to_vec())
    }
}

/// Zstandard codec.
#[derive(Clone, Copy, Debug)]
pub struct Zstd {
    level: i32,
}

impl Zstd {
    /// Codec at an explicit compression level (zstd accepts 1..=22).
    pub fn new(level: i32) -> Self {
        Self { level }
    }

    /// The configured compression level.
    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for Zstd {
    /// Level 3 balances ratio against encode cost for event-sized payloads.
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl Compressor for Zstd {
    fn compress(&self, input: &[u8]) -> CompressResult<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        zstd::encode_all(input, self.level)
            .map_err(|e| CompressError::CompressionFailed(e.to_string()))
    }

    fn decompress(&self, input: &[u8]) -> CompressResult<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        zstd::decode_all(input).map_err(|e| CompressError::DecompressionFailed(e.to_string()))
    }
}
