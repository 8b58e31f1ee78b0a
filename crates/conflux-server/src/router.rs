use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use conflux_pipeline::Pipeline;

use crate::handler;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pipeline: Pipeline,
    timeout: Duration,
}

impl AppState {
    /// Pairs a pipeline with the per-event deadline it runs under.
    pub fn new(pipeline: Pipeline, timeout: Duration) -> Self {
        Self { pipeline, timeout }
    }

    pub(crate) fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builds the axum router with all Conflux endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(handler::ingest_handler))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
