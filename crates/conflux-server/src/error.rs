use thiserror::Error;

/// A wire event that cannot be turned into a pipeline message.
///
/// These are client mistakes. The server answers 400 and never retries.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("event carries no correlation key")]
    MissingKey,

    #[error("cannot derive a topic from event source: {event_source:?}")]
    EmptyTopic { event_source: String },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid event: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
