use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use conflux_types::Message;

/// One fragment's contribution to the joint document.
///
/// Content that parses as a JSON object is nested as structured data; any
/// other content (plain text, JSON arrays, scalars) stays a string.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum JointValue {
    Structured(Value),
    Raw(String),
}

fn joint_value(message: &Message) -> JointValue {
    match serde_json::from_str::<Value>(message.content()) {
        Ok(value) if value.is_object() => {
            debug!(
                source = %message.source(),
                "content is a JSON object, nesting it in the joint message"
            );
            JointValue::Structured(value)
        }
        _ => {
            debug!(
                source = %message.source(),
                "content is not a JSON object, joining it as a string"
            );
            JointValue::Raw(message.content().to_owned())
        }
    }
}

/// Serialize the fragments into one JSON object keyed by source.
///
/// Keys are emitted in sorted order, so the output is deterministic no
/// matter in which order the fragments arrived.
pub(crate) fn compose(messages: &[Message]) -> serde_json::Result<String> {
    let content_by_source: BTreeMap<&str, JointValue> = messages
        .iter()
        .map(|message| (message.source(), joint_value(message)))
        .collect();

    serde_json::to_string(&content_by_source)
}
