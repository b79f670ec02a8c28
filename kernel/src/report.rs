use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::code::UploadErrorCode;
use crate::error::UploadError;
use crate::file::UploadedFile;

/// Outcome of processing one uploaded file.
///
/// Produced by the server for every file of a request and rendered by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileReport {
    /// Form field the file was submitted under
    pub field: String,
    /// Position inside an array style field
    pub index: Option<usize>,
    /// Original file name on the client
    pub client_name: String,
    /// MIME type as reported by the client
    pub mime_type: String,
    /// Size of the file in bytes
    pub size: u64,
    /// Upload error code, 0 on success
    #[schema(value_type = i64)]
    pub error_code: UploadErrorCode,
    /// Random identifier used to build the saved file name
    pub uid: String,
    /// Where the file was saved, if it was
    pub saved_path: Option<String>,
    /// Why the file was not saved
    pub message: Option<String>,
}

impl FileReport {
    #[must_use]
    pub fn new(field: &str, index: Option<usize>, file: &UploadedFile) -> Self {
        Self {
            field: field.to_owned(),
            index,
            client_name: file.client_name().to_owned(),
            mime_type: file.mime_type().to_owned(),
            size: file.size(),
            error_code: file.error_code(),
            uid: file.uid().to_owned(),
            saved_path: file
                .saved_path()
                .map(|path| path.to_string_lossy().into_owned()),
            message: None,
        }
    }

    /// Records the outcome of a save attempt.
    #[must_use]
    pub fn with_outcome(mut self, outcome: Result<(), &UploadError>) -> Self {
        if let Err(e) = outcome {
            self.message = Some(e.to_string());
        }
        self
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.saved_path.is_some()
    }
}
