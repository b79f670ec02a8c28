#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]

//! Normalizes field grouped upload metadata into per-file objects and moves
//! every uploaded file from its temporary location to permanent storage at most once.

pub mod code;
pub mod error;
pub mod file;
pub mod mover;
pub mod registry;
pub mod report;
pub mod source;

pub use code::UploadErrorCode;
pub use error::{SourceError, UploadError};
pub use file::{FileState, UploadedFile};
pub use mover::{FsMover, Mover};
pub use registry::{FieldFiles, UploadRegistry, Uploads};
pub use report::FileReport;
pub use source::{Columns, ParallelRecords, RawField, RawRecord, UploadSource};
