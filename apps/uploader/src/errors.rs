use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// User-visible submit failures. `Display` is the exact message shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please select a resume file.")]
    NoFileSelected,

    /// Transport errors, timeouts and non-2xx responses all collapse here.
    #[error("Failed to upload and analyze the resume. Please try again.")]
    RequestFailed,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("An analysis request is already in progress")]
    SubmitInProgress,

    #[error("Invalid upload: {0}")]
    Multipart(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Upload(UploadError::NoFileSelected) => (
                StatusCode::BAD_REQUEST,
                "NO_FILE_SELECTED",
                UploadError::NoFileSelected.to_string(),
            ),
            AppError::Upload(UploadError::RequestFailed) => (
                StatusCode::BAD_GATEWAY,
                "REQUEST_FAILED",
                UploadError::RequestFailed.to_string(),
            ),
            AppError::SubmitInProgress => (StatusCode::CONFLICT, "SUBMIT_IN_PROGRESS", self.to_string()),
            AppError::Multipart(msg) => {
                tracing::warn!("Rejected multipart upload: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_UPLOAD",
                    "The uploaded form could not be read".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
