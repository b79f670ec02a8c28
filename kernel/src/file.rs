use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::code::UploadErrorCode;
use crate::error::UploadError;
use crate::mover::Mover;
use crate::source::RawRecord;

const UID_LEN: usize = 32;

/// Where an uploaded file stands in its save-once lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Still in its temporary location and may be saved.
    Pending,
    /// Moved to its permanent location. Terminal.
    Saved,
    /// The only move attempt failed. The file stays where it was. Terminal.
    Failed,
}

/// One uploaded file, before and after it is moved to permanent storage.
///
/// A file can be saved at most once. Afterwards it must be handled as a regular file
/// at [`UploadedFile::saved_path`].
#[derive(Debug)]
pub struct UploadedFile {
    client_name: String,
    mime_type: String,
    size: u64,
    error: UploadErrorCode,
    temp_location: PathBuf,
    uid: OnceCell<String>,
    state: Lifecycle,
}

#[derive(Debug)]
enum Lifecycle {
    Pending,
    Saved(PathBuf),
    Failed,
}

impl UploadedFile {
    #[must_use]
    pub fn new(record: RawRecord) -> Self {
        Self {
            client_name: record.name,
            mime_type: record.mime_type,
            size: record.size,
            error: record.error,
            temp_location: PathBuf::from(record.tmp_location),
            uid: OnceCell::new(),
            state: Lifecycle::Pending,
        }
    }

    /// Moves the file from its temporary location to `destination`.
    ///
    /// Only one move is ever attempted per file. On success the temporary location
    /// must no longer be relied on.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`UploadError::AlreadySaved`] when the file has been saved before
    /// - [`UploadError::AttemptConsumed`] when a previous move failed
    /// - [`UploadError::UploadFailed`] when the upload itself did not succeed
    /// - [`UploadError::MoveFailed`] when the mover reports a failure
    pub fn save<P, M>(&mut self, destination: P, mover: &M) -> Result<(), UploadError>
    where
        P: AsRef<Path>,
        M: Mover + ?Sized,
    {
        match self.state {
            Lifecycle::Saved(_) => return Err(UploadError::AlreadySaved),
            Lifecycle::Failed => return Err(UploadError::AttemptConsumed),
            Lifecycle::Pending => {}
        }
        if !self.is_successful() {
            return Err(UploadError::UploadFailed(self.error));
        }

        let destination = destination.as_ref();
        match mover.move_file(&self.temp_location, destination) {
            Ok(()) => {
                tracing::debug!(
                    "file '{}' saved to {}",
                    self.client_name,
                    destination.display()
                );
                self.state = Lifecycle::Saved(destination.to_path_buf());
                Ok(())
            }
            Err(source) => {
                tracing::warn!(
                    "file '{}' not saved to {}. Error: {source}",
                    self.client_name,
                    destination.display()
                );
                self.state = Lifecycle::Failed;
                Err(UploadError::MoveFailed {
                    path: destination.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Returns `true` if the file was uploaded successfully.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.error.is_ok()
    }

    #[must_use]
    pub fn state(&self) -> FileState {
        match self.state {
            Lifecycle::Pending => FileState::Pending,
            Lifecycle::Saved(_) => FileState::Saved,
            Lifecycle::Failed => FileState::Failed,
        }
    }

    /// Original name of the file on the client machine.
    ///
    /// Never use it as a filesystem path without sanitizing it first.
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// MIME type as reported by the client, for example `image/gif`.
    /// It is not checked against the content.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size of the uploaded file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn error_code(&self) -> UploadErrorCode {
        self.error
    }

    /// Server side location of the uploaded data until the file is saved.
    #[must_use]
    pub fn temp_location(&self) -> &Path {
        &self.temp_location
    }

    /// Path the file was saved to, `None` until [`UploadedFile::save`] succeeds.
    #[must_use]
    pub fn saved_path(&self) -> Option<&Path> {
        match &self.state {
            Lifecycle::Saved(path) => Some(path),
            _ => None,
        }
    }

    /// Random identifier of this file, generated on first use and stable afterwards.
    ///
    /// Useful as a file name or part of one to avoid name conflicts when many
    /// files are stored together. Two files with identical metadata get different ids.
    pub fn uid(&self) -> &str {
        self.uid.get_or_init(|| self.generate_uid())
    }

    fn generate_uid(&self) -> String {
        let seed = format!(
            "{}{}{}{}",
            self.mime_type,
            self.temp_location.display(),
            self.size,
            self.client_name
        );
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let salt: u64 = rand::random();
        let hash = blake3::hash(format!("{seed}{stamp}{salt}").as_bytes());
        hash.to_hex()[..UID_LEN].to_owned()
    }
}

impl fmt::Display for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Type: {}", self.mime_type)?;
        writeln!(f, "Temp: {}", self.temp_location.display())?;
        writeln!(f, "Error: {}", self.error)?;
        writeln!(f, "Size: {}", self.size)?;
        writeln!(f, "Name: {}", self.client_name)?;
        writeln!(f, "UID: {}", self.uid())
    }
}
