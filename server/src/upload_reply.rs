use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kernel::FileReport;

/// Per-file outcomes of one upload request.
///
/// Answers `201 Created` when at least one file was saved, `200 OK` otherwise.
pub struct UploadReply {
    reports: Vec<FileReport>,
}

impl UploadReply {
    #[must_use]
    pub fn new(reports: Vec<FileReport>) -> Self {
        Self { reports }
    }

    fn status(&self) -> StatusCode {
        if self.reports.iter().any(FileReport::is_saved) {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        }
    }
}

impl IntoResponse for UploadReply {
    fn into_response(self) -> Response {
        (self.status(), Json(self.reports)).into_response()
    }
}
