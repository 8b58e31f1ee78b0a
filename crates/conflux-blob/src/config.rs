use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// The storage operations that carry their own time budgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Listing the contents associated with a key.
    List,
    /// Reading the content of one slot.
    Read,
    /// Writing content into a slot.
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Read => "read",
            Operation::Write => "write",
        };
        f.write_str(name)
    }
}

/// Per-operation time budgets.
///
/// Resolution order: the operation's own override, then the configured
/// default, then [`OperationTimeouts::HARD_DEFAULT`]. There is no way to
/// configure an unbounded operation; a store call always has a finite
/// budget even when the ambient context carries no deadline.
#[derive(Clone, Debug, Default)]
pub struct OperationTimeouts {
    default: Option<Duration>,
    overrides: HashMap<Operation, Duration>,
}

impl OperationTimeouts {
    /// Budget applied when neither an override nor a default is set.
    pub const HARD_DEFAULT: Duration = Duration::from_secs(30);

    /// No overrides, no default: every operation gets the hard default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default budget for operations without an override.
    pub fn with_default(mut self, timeout: Duration) -> Self {
        self.default = Some(timeout);
        self
    }

    /// Override the budget of one operation.
    pub fn with_operation(mut self, operation: Operation, timeout: Duration) -> Self {
        self.overrides.insert(operation, timeout);
        self
    }

    /// The effective budget for `operation`.
    pub fn timeout_for(&self, operation: Operation) -> Duration {
        self.overrides
            .get(&operation)
            .copied()
            .or(self.default)
            .unwrap_or(Self::HARD_DEFAULT)
    }
}

/// Configuration of a [`crate::BlobEventStore`].
///
/// The read policy and compressor are not part of the config value; the
/// store constructor takes them explicitly so a deployment cannot fall
/// into an unintended conflict-resolution or codec choice.
#[derive(Clone, Debug, Default)]
pub struct BlobStoreConfig {
    folder: Option<String>,
    timeouts: OperationTimeouts,
}

impl BlobStoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nest all slots under a folder prefix.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_timeouts(mut self, timeouts: OperationTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn timeouts(&self) -> &OperationTimeouts {
        &self.timeouts
    }
}
