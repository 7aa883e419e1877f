//! HTTP API
//!
//! `POST /api/plan` runs the plan pipeline; `GET /health` reports liveness.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use eyre::{Context, Result};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

mod error;

pub use error::{ApiError, ErrorBody};

use crate::config::Config;
use crate::plan::{PlanInput, PlanOrchestrator, PlanResponse};

/// Shared handler state
pub struct AppState {
    pub orchestrator: PlanOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: PlanOrchestrator) -> Self {
        Self { orchestrator }
    }
}

/// Build the router with its middleware
pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/plan", post(plan_handler).fallback(method_not_allowed))
        .route("/health", get(health_handler))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &Config, orchestrator: PlanOrchestrator) -> Result<()> {
    let addr = config.server.address();
    let state = Arc::new(AppState::new(orchestrator));
    let app = router(state, config.server.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!("Trip planner listening on {}", addr);
    println!("Trip planner server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Trip planner stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "shutdown_signal: failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown_signal: received Ctrl-C");
}

async fn plan_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    debug!("plan_handler: called");
    let body = parse_body(body)?;
    let response = state.orchestrator.plan(PlanInput::from_json(&body)).await?;
    Ok(Json(response))
}

/// Buffer and parse the request body; an empty body reads as `{}`
fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<Value, ApiError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            warn!(error = %rejection, "parse_body: failed to read body");
            ApiError::BodyRead
        }
    })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        debug!(error = %e, "parse_body: invalid JSON");
        ApiError::InvalidJson
    })
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.orchestrator.model(),
    }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_empty_is_empty_object() {
        let value = parse_body(Ok(Bytes::from_static(b"  \n"))).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_parse_body_invalid_json() {
        let err = parse_body(Ok(Bytes::from_static(b"{destination:"))).unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson));
    }

    #[test]
    fn test_parse_body_valid() {
        let value = parse_body(Ok(Bytes::from_static(br#"{"destination":"Oslo"}"#))).unwrap();
        assert_eq!(value["destination"], "Oslo");
    }
}
