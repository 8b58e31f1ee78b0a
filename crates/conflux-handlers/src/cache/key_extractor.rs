use conflux_pipeline::BoxError;
use conflux_types::Message;

/// Derives the cache key a message is deduplicated under.
///
/// Closures over a [`Message`] are extractors too, which keeps one-off
/// extractors (a field plucked out of JSON content, say) out of the way.
pub trait KeyExtractor: Send + Sync {
    fn extract(&self, message: &Message) -> Result<String, BoxError>;
}

impl<F> KeyExtractor for F
where
    F: Fn(&Message) -> Result<String, BoxError> + Send + Sync,
{
    fn extract(&self, message: &Message) -> Result<String, BoxError> {
        self(message)
    }
}

/// The default extractor: the message key itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageKey;

impl KeyExtractor for MessageKey {
    fn extract(&self, message: &Message) -> Result<String, BoxError> {
        Ok(message.key().to_owned())
    }
}
