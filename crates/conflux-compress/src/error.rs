use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),
}

pub type CompressResult<T> = Result<T, CompressError>;
