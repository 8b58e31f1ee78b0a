/// Errors cross the executor type-erased so a downstream stage's error
/// surfaces through upstream stages unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The pipeline deadline elapsed while a stage was running.
///
/// This error shadows whatever the stage eventually returns; the stage's
/// task is not cancelled. Downcast from [`BoxError`] to tell a timeout from
/// a stage failure.
#[derive(Debug, thiserror::Error)]
#[error("pipeline timed out at stage {stage} ({handler})")]
pub struct DeadlineExceeded {
    /// Zero-based index of the deepest stage that had started when the
    /// deadline fired.
    pub stage: usize,
    /// That stage's handler name.
    pub handler: String,
}

/// A stage's task panicked instead of returning.
#[derive(Debug, thiserror::Error)]
#[error("stage {stage} ({handler}) panicked")]
pub struct StagePanicked {
    pub stage: usize,
    pub handler: String,
}
