use std::time::{Duration, Instant};

/// Deadline carrier threaded through every call in a Conflux pipeline.
///
/// A context either carries an absolute deadline or is unbounded. Deadlines
/// only ever tighten: deriving a context from an existing one keeps the
/// earlier of the two deadlines, so a callee can never outlive its caller's
/// budget.
///
/// The context is deliberately small and cheap to copy. It does not carry
/// request-scoped values or cancellation signals; stages that need to stop
/// early race their work against [`Context::deadline`] themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// A context with no deadline. Calls under it may take arbitrarily long.
    pub fn unbounded() -> Self {
        Self { deadline: None }
    }

    /// A context that expires at the given instant.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// The absolute deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Derive a child context whose deadline is at most `timeout` from now.
    ///
    /// The child keeps the ambient deadline when that is already sooner, so
    /// a per-operation timeout can shorten the budget but never extend it.
    pub fn bounded_by(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(ambient) => ambient.min(candidate),
            None => candidate,
        };
        Self::with_deadline(deadline)
    }

    /// The effective deadline for an operation allowed `timeout` from now:
    /// the sooner of the ambient deadline and `now + timeout`.
    pub fn deadline_within(&self, timeout: Duration) -> Instant {
        let candidate = Instant::now() + timeout;
        match self.deadline {
            Some(ambient) => ambient.min(candidate),
            None => candidate,
        }
    }

    /// Time left before the deadline. `None` when unbounded; zero when the
    /// deadline has already passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has already passed. Unbounded contexts never
    /// expire.
    pub fn is_expired(&self) -> bool {
        match self.deadline {
            Some(d) => Instant::now() >= d,
            None => false,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::unbounded()
    }
}
