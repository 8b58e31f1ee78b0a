use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::{error, warn};

use conflux_pipeline::DeadlineExceeded;
use conflux_types::Context;

use crate::convert;
use crate::envelope::EventEnvelope;
use crate::router::AppState;

/// Accepts one wire event and runs it through the pipeline.
///
/// Client mistakes (unparseable payloads, unconvertible envelopes) answer
/// 400 and are never retried. A pipeline deadline elapse answers 504,
/// anything else that fails answers 500, and success is 202 since
/// acceptance says nothing about whether a composition fired.
pub async fn ingest_handler(
    State(state): State<AppState>,
    payload: Result<Json<EventEnvelope>, JsonRejection>,
) -> Response {
    let Json(envelope) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "rejected malformed event payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let message = match convert::to_message(&envelope) {
        Ok(message) => message,
        Err(error) => {
            warn!(id = %envelope.id, %error, "rejected event");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response();
        }
    };

    let ctx = Context::with_timeout(state.timeout());
    match state.pipeline().process(&ctx, message).await {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({ "id": envelope.id }))).into_response(),
        Err(error) if error.is::<DeadlineExceeded>() => {
            error!(id = %envelope.id, %error, "pipeline deadline exceeded");
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
        Err(error) => {
            error!(id = %envelope.id, %error, "pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "conflux-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
