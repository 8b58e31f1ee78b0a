use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use conflux_types::{Context, Message};
use tracing::error;

use crate::error::{BoxError, DeadlineExceeded, StagePanicked};
use crate::handler::{CallNext, Handler};

/// An ordered, append-only chain of handlers.
///
/// Build the chain once with [`Pipeline::with_handler`], then call
/// [`Pipeline::process`] from as many tasks as needed; processing never
/// mutates the pipeline.
///
/// # Deadline semantics
///
/// Each stage runs on its own task while the call point waits for whichever
/// comes first: the stage's result or the context deadline. On deadline the
/// pipeline returns [`DeadlineExceeded`] at once, naming the deepest stage
/// that had started, and the losing task keeps running in the background
/// until it finishes on its own. Stages must propagate the context into
/// their own downstream calls to avoid holding resources past the deadline.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Arc<dyn Handler>]>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// An empty pipeline. Processing is the terminal no-op until handlers
    /// are appended.
    pub fn new() -> Self {
        Self {
            stages: Arc::from(Vec::new()),
        }
    }

    /// Append a handler to the end of the chain.
    pub fn with_handler(self, handler: impl Handler + 'static) -> Self {
        let mut stages = self.stages.to_vec();
        stages.push(Arc::new(handler));
        Self {
            stages: stages.into(),
        }
    }

    /// Number of stages in the chain.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if no handlers have been appended.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run `message` through the chain.
    ///
    /// Returns `Ok(())` when every invoked stage succeeded, the first stage
    /// error otherwise. The error is exactly what the failing stage
    /// returned, so callers can downcast it; a deadline elapse yields
    /// [`DeadlineExceeded`] instead. There are no retries at this level.
    pub async fn process(&self, ctx: &Context, message: Message) -> Result<(), BoxError> {
        let deepest_stage = Arc::new(AtomicUsize::new(0));
        run_from(Arc::clone(&self.stages), 0, deepest_stage, *ctx, message).await
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|stage| stage.name()).collect();
        f.debug_struct("Pipeline").field("stages", &names).finish()
    }
}

/// Run the chain suffix starting at `index`.
///
/// `deepest_stage` is shared by every frame of one traversal; it holds the
/// highest index that reached a handler, which is the stage a deadline
/// elapse gets attributed to.
pub(crate) async fn run_from(
    stages: Arc<[Arc<dyn Handler>]>,
    index: usize,
    deepest_stage: Arc<AtomicUsize>,
    ctx: Context,
    message: Message,
) -> Result<(), BoxError> {
    // Terminal no-op: past the last handler the chain is done.
    let Some(handler) = stages.get(index) else {
        return Ok(());
    };
    deepest_stage.fetch_max(index, Ordering::SeqCst);
    let handler = Arc::clone(handler);
    let name = handler.name().to_owned();
    let next = CallNext::new(Arc::clone(&stages), index + 1, Arc::clone(&deepest_stage));

    let mut stage_task = tokio::spawn(async move {
        handler.process(&ctx, message, next).await
    });

    tokio::select! {
        finished = &mut stage_task => match finished {
            Ok(result) => {
                if let Err(e) = &result {
                    error!(stage = index, handler = %name, error = %e, "stage failed");
                }
                result
            }
            Err(_join_error) => {
                error!(stage = index, handler = %name, "stage panicked");
                Err(Box::new(StagePanicked {
                    stage: index,
                    handler: name,
                }) as BoxError)
            }
        },
        _ = deadline_sleep(ctx.deadline()) => {
            // Every live frame races this same deadline and the outermost
            // select wins it, so the offender is the deepest started stage,
            // not this frame. The watermark only holds indexes that reached
            // a handler.
            let stage = deepest_stage.load(Ordering::SeqCst);
            let handler = stages[stage].name().to_owned();
            error!(stage, handler = %handler, "stage deadline exceeded");
            // The stage task is detached, not aborted; it keeps running
            // until it observes the deadline itself.
            Err(Box::new(DeadlineExceeded { stage, handler }) as BoxError)
        }
    }
}

/// Sleep until `deadline`; never wakes for an unbounded context.
async fn deadline_sleep(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test handlers
    // -----------------------------------------------------------------------

    /// Sleeps, then forwards.
    struct SleepHandler {
        delay: Duration,
    }

    #[async_trait]
    impl Handler for SleepHandler {
        fn name(&self) -> &str {
            "sleep"
        }

        async fn process(
            &self,
            ctx: &Context,
            message: Message,
            next: CallNext,
        ) -> Result<(), BoxError> {
            tokio::time::sleep(self.delay).await;
            next.call(ctx, message).await
        }
    }

    /// Fails without forwarding.
    struct FailingHandler {
        message: &'static str,
    }

    #[async_trait]
    impl Handler for FailingHandler {
        fn name(&self) -> &str {
            "failing"
        }

        async fn process(
            &self,
            _ctx: &Context,
            _message: Message,
            _next: CallNext,
        ) -> Result<(), BoxError> {
            Err(self.message.into())
        }
    }

    /// Forwards, then replaces any downstream error with its own.
    struct RethrowHandler {
        replacement: &'static str,
    }

    #[async_trait]
    impl Handler for RethrowHandler {
        fn name(&self) -> &str {
            "rethrow"
        }

        async fn process(
            &self,
            ctx: &Context,
            message: Message,
            next: CallNext,
        ) -> Result<(), BoxError> {
            match next.call(ctx, message).await {
                Ok(()) => Ok(()),
                Err(_) => Err(self.replacement.into()),
            }
        }
    }

    /// Records the messages it sees, then forwards.
    struct RecordingHandler {
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Handler for RecordingHandler {
        fn name(&self) -> &str {
            "recording"
        }

        async fn process(
            &self,
            ctx: &Context,
            message: Message,
            next: CallNext,
        ) -> Result<(), BoxError> {
            self.seen
                .lock()
                .expect("lock poisoned")
                .push(message.key().to_owned());
            next.call(ctx, message).await
        }
    }

    /// Succeeds without forwarding.
    struct HaltingHandler;

    #[async_trait]
    impl Handler for HaltingHandler {
        fn name(&self) -> &str {
            "halting"
        }

        async fn process(
            &self,
            _ctx: &Context,
            _message: Message,
            _next: CallNext,
        ) -> Result<(), BoxError> {
            Ok(())
        }
    }

    fn msg() -> Message {
        Message::new("k1", "s1", "content")
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, RecordingHandler) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler = RecordingHandler {
            seen: Arc::clone(&seen),
        };
        (seen, handler)
    }

    // -----------------------------------------------------------------------
    // Chain execution
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn happy_case_runs_every_stage() {
        let (seen_a, handler_a) = recorder();
        let (seen_b, handler_b) = recorder();
        let pipeline = Pipeline::new().with_handler(handler_a).with_handler(handler_b);

        pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap();
        assert_eq!(seen_a.lock().unwrap().len(), 1);
        assert_eq!(seen_b.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_pipeline_succeeds() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());
        pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn first_failure_halts_the_chain() {
        let (seen, recording) = recorder();
        let pipeline = Pipeline::new()
            .with_handler(SleepHandler {
                delay: Duration::from_nanos(1),
            })
            .with_handler(FailingHandler { message: "fail" })
            .with_handler(recording);

        let err = pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "fail");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn downstream_error_crosses_stages_unchanged() {
        #[derive(Debug)]
        struct MarkerError;

        impl std::fmt::Display for MarkerError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("marker")
            }
        }

        impl std::error::Error for MarkerError {}

        struct MarkerFailure;

        #[async_trait]
        impl Handler for MarkerFailure {
            fn name(&self) -> &str {
                "marker-failure"
            }

            async fn process(
                &self,
                _ctx: &Context,
                _message: Message,
                _next: CallNext,
            ) -> Result<(), BoxError> {
                Err(Box::new(MarkerError))
            }
        }

        let pipeline = Pipeline::new()
            .with_handler(SleepHandler {
                delay: Duration::from_nanos(1),
            })
            .with_handler(MarkerFailure);

        let err = pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<MarkerError>().is_some());
    }

    #[tokio::test]
    async fn stage_may_rethrow_downstream_error() {
        let pipeline = Pipeline::new()
            .with_handler(RethrowHandler {
                replacement: "rethrown error",
            })
            .with_handler(FailingHandler {
                message: "original error",
            });

        let err = pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "rethrown error");
    }

    #[tokio::test]
    async fn not_calling_next_halts_silently() {
        let (seen, recording) = recorder();
        let pipeline = Pipeline::new()
            .with_handler(HaltingHandler)
            .with_handler(recording);

        pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Deadline racing
    // -----------------------------------------------------------------------

    fn slow_pipeline() -> Pipeline {
        Pipeline::new()
            .with_handler(SleepHandler {
                delay: Duration::from_millis(10),
            })
            .with_handler(SleepHandler {
                delay: Duration::from_millis(100),
            })
    }

    #[tokio::test]
    async fn deadline_elapses_during_first_stage() {
        let ctx = Context::with_timeout(Duration::from_millis(1));
        let err = slow_pipeline().process(&ctx, msg()).await.unwrap_err();

        let timeout = err
            .downcast_ref::<DeadlineExceeded>()
            .expect("should be a deadline error");
        assert_eq!(timeout.stage, 0);
    }

    #[tokio::test]
    async fn deadline_elapses_during_second_stage() {
        let ctx = Context::with_timeout(Duration::from_millis(60));
        let err = slow_pipeline().process(&ctx, msg()).await.unwrap_err();

        let timeout = err
            .downcast_ref::<DeadlineExceeded>()
            .expect("should be a deadline error");
        assert_eq!(timeout.stage, 1);
        assert_eq!(timeout.handler, "sleep");
    }

    #[tokio::test]
    async fn deadline_names_the_deepest_started_stage() {
        struct NamedSleep {
            name: &'static str,
            delay: Duration,
        }

        #[async_trait]
        impl Handler for NamedSleep {
            fn name(&self) -> &str {
                self.name
            }

            async fn process(
                &self,
                ctx: &Context,
                message: Message,
                next: CallNext,
            ) -> Result<(), BoxError> {
                tokio::time::sleep(self.delay).await;
                next.call(ctx, message).await
            }
        }

        let pipeline = Pipeline::new()
            .with_handler(NamedSleep {
                name: "intake",
                delay: Duration::from_millis(10),
            })
            .with_handler(NamedSleep {
                name: "enrich",
                delay: Duration::from_millis(10),
            })
            .with_handler(NamedSleep {
                name: "publish",
                delay: Duration::from_millis(200),
            });

        let ctx = Context::with_timeout(Duration::from_millis(100));
        let err = pipeline.process(&ctx, msg()).await.unwrap_err();

        // The outermost frame reports the timeout, but the attribution must
        // point at the stage that was actually running.
        let timeout = err
            .downcast_ref::<DeadlineExceeded>()
            .expect("should be a deadline error");
        assert_eq!(timeout.stage, 2);
        assert_eq!(timeout.handler, "publish");
        assert_eq!(
            timeout.to_string(),
            "pipeline timed out at stage 2 (publish)"
        );
    }

    #[tokio::test]
    async fn chain_finishes_within_deadline() {
        let ctx = Context::with_timeout(Duration::from_millis(500));
        slow_pipeline().process(&ctx, msg()).await.unwrap();
    }

    #[tokio::test]
    async fn unbounded_context_never_times_out() {
        let pipeline = Pipeline::new().with_handler(SleepHandler {
            delay: Duration::from_millis(20),
        });
        pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn timed_out_stage_keeps_running_detached() {
        struct IgnoresDeadline {
            finished: Arc<AtomicBool>,
        }

        #[async_trait]
        impl Handler for IgnoresDeadline {
            fn name(&self) -> &str {
                "ignores-deadline"
            }

            async fn process(
                &self,
                _ctx: &Context,
                _message: Message,
                _next: CallNext,
            ) -> Result<(), BoxError> {
                tokio::time::sleep(Duration::from_millis(30)).await;
                self.finished.store(true, Ordering::SeqCst);
                Ok(())
            }
        }

        let finished = Arc::new(AtomicBool::new(false));
        let pipeline = Pipeline::new().with_handler(IgnoresDeadline {
            finished: Arc::clone(&finished),
        });

        let ctx = Context::with_timeout(Duration::from_millis(1));
        let err = pipeline.process(&ctx, msg()).await.unwrap_err();
        assert!(err.downcast_ref::<DeadlineExceeded>().is_some());
        assert!(!finished.load(Ordering::SeqCst));

        // The loser was not aborted: it finishes on its own schedule.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stage_can_tighten_deadline_for_downstream() {
        struct Tightens;

        #[async_trait]
        impl Handler for Tightens {
            fn name(&self) -> &str {
                "tightens"
            }

            async fn process(
                &self,
                _ctx: &Context,
                message: Message,
                next: CallNext,
            ) -> Result<(), BoxError> {
                let tight = Context::with_timeout(Duration::from_millis(1));
                next.call(&tight, message).await
            }
        }

        let pipeline = Pipeline::new().with_handler(Tightens).with_handler(SleepHandler {
            delay: Duration::from_millis(50),
        });

        let err = pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap_err();
        let timeout = err
            .downcast_ref::<DeadlineExceeded>()
            .expect("should be a deadline error");
        assert_eq!(timeout.stage, 1);
    }

    // -----------------------------------------------------------------------
    // Panic containment
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn panicking_stage_surfaces_as_error() {
        struct Panics;

        #[async_trait]
        impl Handler for Panics {
            fn name(&self) -> &str {
                "panics"
            }

            async fn process(
                &self,
                _ctx: &Context,
                _message: Message,
                _next: CallNext,
            ) -> Result<(), BoxError> {
                panic!("stage blew up");
            }
        }

        let pipeline = Pipeline::new().with_handler(Panics);
        let err = pipeline
            .process(&Context::unbounded(), msg())
            .await
            .unwrap_err();

        let panicked = err
            .downcast_ref::<StagePanicked>()
            .expect("should be a panic error");
        assert_eq!(panicked.stage, 0);
        assert_eq!(panicked.handler, "panics");
    }

    // -----------------------------------------------------------------------
    // Concurrent processing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn pipeline_is_shareable_across_tasks() {
        struct Counting {
            count: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl Handler for Counting {
            fn name(&self) -> &str {
                "counting"
            }

            async fn process(
                &self,
                ctx: &Context,
                message: Message,
                next: CallNext,
            ) -> Result<(), BoxError> {
                self.count.fetch_add(1, Ordering::SeqCst);
                next.call(ctx, message).await
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new().with_handler(Counting {
            count: Arc::clone(&count),
        });

        let mut tasks = Vec::new();
        for i in 0..8 {
            let pipeline = pipeline.clone();
            tasks.push(tokio::spawn(async move {
                let message = Message::new(format!("k{i}"), "s", "c");
                pipeline.process(&Context::unbounded(), message).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(count.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn debug_lists_stage_names() {
        let pipeline = Pipeline::new()
            .with_handler(HaltingHandler)
            .with_handler(SleepHandler {
                delay: Duration::ZERO,
            });
        let debug = format!("{pipeline:?}");
        assert!(debug.contains("halting"));
        assert!(debug.contains("sleep"));
        assert_eq!(pipeline.len(), 2);
    }
}
