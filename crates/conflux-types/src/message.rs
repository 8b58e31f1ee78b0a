use std::fmt;

use serde::{Deserialize, Serialize};

/// An event flowing through a Conflux pipeline.
///
/// A message carries three pieces of information:
///
/// - `key` — the correlation key; events that belong together share a key
/// - `source` — which producer emitted the event
/// - `content` — the opaque payload, carried as a string
///
/// Handlers may rewrite any of the three as a message moves down the chain
/// (the transformer does exactly that), so all fields have both accessors
/// and setters.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    key: String,
    source: String,
    content: String,
}

impl Message {
    /// Create a message from its parts.
    pub fn new(
        key: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
            content: content.into(),
        }
    }

    /// The correlation key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The producer that emitted this event.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The payload.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Consume the message, returning the payload.
    pub fn into_content(self) -> String {
        self.content
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Content can be large; show a bounded preview.
        let preview: String = self.content.chars().take(48).collect();
        let ellipsis = if self.content.chars().count() > 48 {
            "…"
        } else {
            ""
        };
        f.debug_struct("Message")
            .field("key", &self.key)
            .field("source", &self.source)
            .field("content", &format_args!("{preview:?}{ellipsis}"))
            .finish()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.key, self.source)
    }
}
