//! HTTP error mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::plan::PlanError;

/// Every failure the API reports, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request too large.")]
    PayloadTooLarge,

    #[error("Invalid JSON payload.")]
    InvalidJson,

    #[error("Unexpected error parsing request.")]
    BodyRead,

    #[error("Method not allowed.")]
    MethodNotAllowed,

    #[error("Not found.")]
    NotFound,

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidJson => StatusCode::BAD_REQUEST,
            Self::BodyRead => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Plan(PlanError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Plan(PlanError::Configuration(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Plan(PlanError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            Self::Plan(PlanError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
