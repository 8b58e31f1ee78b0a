use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Wire-level event as posted to the ingestion endpoint.
///
/// The `source` may carry a topic suffix after a `#` (for example
/// `/registries/default/streams/orders#payment`); the correlation key rides
/// in the `key` field. Payloads are free-form: JSON objects are kept
/// structured, anything else is treated as a string.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Producer-assigned identifier; generated when absent.
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,

    pub source: String,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub time: Option<DateTime<Utc>>,

    /// Correlation key joining this event with its siblings.
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub data: Option<Value>,
}
