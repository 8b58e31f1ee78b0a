use std::collections::{HashMap, HashSet};

use conflux_types::Message;

/// A transformation failed or could not be built.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Two source names claim the same alias.
    #[error("alias conflict: {alias}")]
    AliasConflict { alias: String },

    /// A rule rejected the message it was given.
    #[error("transform rule failed: {reason}")]
    RuleFailed { reason: String },
}

/// Rewrites a message on its way through a [`Transformer`](super::Transformer).
///
/// Closures from [`Message`] to `Result<Message, TransformError>` are rules
/// too.
pub trait Rule: Send + Sync {
    fn apply(&self, message: Message) -> Result<Message, TransformError>;
}

impl<F> Rule for F
where
    F: Fn(Message) -> Result<Message, TransformError> + Send + Sync,
{
    fn apply(&self, message: Message) -> Result<Message, TransformError> {
        self(message)
    }
}

/// Keeps the message as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Rule for Identity {
    fn apply(&self, message: Message) -> Result<Message, TransformError> {
        Ok(message)
    }
}

/// Blanks the content of messages from the listed sources.
#[derive(Clone, Debug)]
pub struct EraseContentFromSources {
    sources: HashSet<String>,
}

impl EraseContentFromSources {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for EraseContentFromSources {
    fn apply(&self, mut message: Message) -> Result<Message, TransformError> {
        if self.sources.contains(message.source()) {
            message.set_content("");
        }
        Ok(message)
    }
}

/// Maps source aliases onto one canonical name.
///
/// Built from a canonical name to aliases map. Construction fails with
/// [`TransformError::AliasConflict`] if the same alias is claimed twice,
/// so a bad mapping surfaces when the pipeline is assembled rather than on
/// the first matching message.
#[derive(Clone, Debug)]
pub struct RenameSources {
    canonical_by_alias: HashMap<String, String>,
}

impl RenameSources {
    pub fn new<I, N, A>(aliases_by_name: I) -> Result<Self, TransformError>
    where
        I: IntoIterator<Item = (N, Vec<A>)>,
        N: Into<String>,
        A: Into<String>,
    {
        let mut canonical_by_alias = HashMap::new();
        for (name, aliases) in aliases_by_name {
            let name = name.into();
            for alias in aliases {
                let alias = alias.into();
                if canonical_by_alias.contains_key(&alias) {
                    return Err(TransformError::AliasConflict { alias });
                }
                canonical_by_alias.insert(alias, name.clone());
            }
        }

        Ok(Self { canonical_by_alias })
    }
}

impl Rule for RenameSources {
    fn apply(&self, mut message: Message) -> Result<Message, TransformError> {
        if let Some(name) = self.canonical_by_alias.get(message.source()) {
            message.set_source(name.clone());
        }
        Ok(message)
    }
}
