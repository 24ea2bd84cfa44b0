use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Model-output parse failures never reach this type; they are replaced by
/// fallback values inside the interview module.
#[derive(Debug, Error)]
pub enum AppError {
    /// Too little text could be recovered from the uploaded document.
    #[error("{0}")]
    Extraction(String),

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Extraction(msg) => {
                tracing::warn!("Resume extraction failed: {msg}");
                msg.clone()
            }
            AppError::Upload(msg) => {
                tracing::warn!("Rejected upload: {msg}");
                self.to_string()
            }
            AppError::Llm(e) => {
                tracing::error!("Model error: {e}");
                self.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({ "error": message }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
