// src/error.rs
//! Request-level error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::analyze::ScorerError;
use crate::classifier::ModelError;
use crate::ingest::FetchError;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("invalid request: {0}")]
    InvalidInput(String),
    #[error("failed to fetch article url: {0}")]
    Fetch(#[from] FetchError),
    #[error("article text too short ({len} < {min} characters)")]
    ContentTooShort { len: usize, min: usize },
    #[error("scorer '{name}' failed: {source}")]
    Scorer {
        name: &'static str,
        #[source]
        source: ScorerError,
    },
    #[error("classifier unavailable: {0}")]
    ModelUnavailable(#[from] ModelError),
}

impl ScoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            ScoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ScoreError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ScoreError::ContentTooShort { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ScoreError::Scorer { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ScoreError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreError::InvalidInput(_) => "invalid_input",
            ScoreError::Fetch(_) => "fetch_error",
            ScoreError::ContentTooShort { .. } => "too_short",
            ScoreError::Scorer { .. } => "scorer_error",
            ScoreError::ModelUnavailable(_) => "model_unavailable",
        }
    }
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
