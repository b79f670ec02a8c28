use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;

/// Request level failures of the upload endpoint. Per-file failures never end up here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("saving files was interrupted: {0}")]
    Join(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Multipart(e) => e.status(),
            ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!("{self}");
        (status, self.to_string()).into_response()
    }
}
