use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of the underlying upload attempt as reported by the receiving environment.
///
/// Follows the common upload error convention where `0` means success and every
/// other value names a distinct failure cause. Values outside the known set are
/// kept verbatim in [`UploadErrorCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum UploadErrorCode {
    /// The file was uploaded successfully
    #[default]
    Ok,
    /// The file exceeds the server side size limit
    IniSize,
    /// The file exceeds the size limit declared by the form
    FormSize,
    /// The file was only partially uploaded
    Partial,
    /// No file was chosen for this slot
    NoFile,
    /// The temporary directory is missing
    NoTmpDir,
    /// The file could not be written to the temporary directory
    CantWrite,
    /// An extension stopped the upload
    Extension,
    /// Any code this crate has no name for
    Other(i64),
}

impl UploadErrorCode {
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == UploadErrorCode::Ok
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            UploadErrorCode::Ok => "uploaded successfully",
            UploadErrorCode::IniSize => "file exceeds the maximum upload size",
            UploadErrorCode::FormSize => "file exceeds the maximum size allowed by the form",
            UploadErrorCode::Partial => "file was only partially uploaded",
            UploadErrorCode::NoFile => "no file was uploaded",
            UploadErrorCode::NoTmpDir => "missing temporary directory",
            UploadErrorCode::CantWrite => "failed to write file to disk",
            UploadErrorCode::Extension => "upload stopped by extension",
            UploadErrorCode::Other(_) => "unknown upload error",
        }
    }
}

impl From<i64> for UploadErrorCode {
    fn from(code: i64) -> Self {
        match code {
            0 => UploadErrorCode::Ok,
            1 => UploadErrorCode::IniSize,
            2 => UploadErrorCode::FormSize,
            3 => UploadErrorCode::Partial,
            4 => UploadErrorCode::NoFile,
            6 => UploadErrorCode::NoTmpDir,
            7 => UploadErrorCode::CantWrite,
            8 => UploadErrorCode::Extension,
            other => UploadErrorCode::Other(other),
        }
    }
}

impl From<UploadErrorCode> for i64 {
    fn from(code: UploadErrorCode) -> Self {
        match code {
            UploadErrorCode::Ok => 0,
            UploadErrorCode::IniSize => 1,
            UploadErrorCode::FormSize => 2,
            UploadErrorCode::Partial => 3,
            UploadErrorCode::NoFile => 4,
            UploadErrorCode::NoTmpDir => 6,
            UploadErrorCode::CantWrite => 7,
            UploadErrorCode::Extension => 8,
            UploadErrorCode::Other(other) => other,
        }
    }
}

impl fmt::Display for UploadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", i64::from(*self))
    }
}
