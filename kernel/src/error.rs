use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::code::UploadErrorCode;

/// Reasons [`crate::UploadedFile::save`] refuses or fails to move a file.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file has already been moved to its permanent location.
    #[error("cannot save: already saved")]
    AlreadySaved,

    /// A previous save attempt failed while moving the file, and the file cannot be saved again.
    #[error("cannot save: previous save attempt failed")]
    AttemptConsumed,

    /// The upload itself did not complete.
    #[error("unable to save: upload error {0}")]
    UploadFailed(UploadErrorCode),

    /// The move from the temporary location failed.
    #[error("failed to save({})", path.display())]
    MoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Malformed raw upload metadata.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid upload source: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field '{field}': {source}")]
    InvalidField {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("field '{field}': parallel sequences differ in length")]
    LengthMismatch { field: String },

    #[error("field '{field}': either all of name, type, size, tmp_location and error are sequences or none is")]
    MixedShape { field: String },
}
