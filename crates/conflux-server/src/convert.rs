//! Turns wire envelopes into pipeline messages.

use serde_json::Value;

use conflux_types::Message;

use crate::envelope::EventEnvelope;
use crate::error::EnvelopeError;

/// The message source is the segment after the last `#` in the event
/// source, or the whole event source when there is none.
pub fn topic_from_source(source: &str) -> &str {
    match source.rsplit_once('#') {
        Some((_, topic)) => topic,
        None => source,
    }
}

/// Convert an envelope into the message the pipeline correlates on.
///
/// Fails when the envelope has no usable correlation key or its source
/// yields an empty topic; both are client errors.
pub fn to_message(envelope: &EventEnvelope) -> Result<Message, EnvelopeError> {
    let key = envelope.key.as_deref().unwrap_or_default();
    if key.is_empty() {
        return Err(EnvelopeError::MissingKey);
    }

    let topic = topic_from_source(&envelope.source);
    if topic.is_empty() {
        return Err(EnvelopeError::EmptyTopic {
            event_source: envelope.source.clone(),
        });
    }

    let content = match &envelope.data {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
    };

    Ok(Message::new(key, topic, content))
}
