use std::collections::BTreeMap;
use std::path::Path;

use axum::extract::multipart::{Field, Multipart, MultipartError};
use kernel::{ParallelRecords, RawField, RawRecord, UploadErrorCode, UploadSource};
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Highest `[N]` index accepted in a part name. Larger indices are treated as `[]`.
pub const MAX_PART_INDEX: usize = 65_535;

/// Position of a part inside its form field, parsed from the part name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// `field`
    Single,
    /// `field[]`
    Append,
    /// `field[N]`
    Index(usize),
}

/// Splits a part name into the field name and the slot of the part.
///
/// Anything that is not `[]` or a numeric `[N]` suffix belongs to the field name.
/// Numeric indices above [`MAX_PART_INDEX`] append like `[]`.
#[must_use]
pub fn parse_part_name(name: &str) -> (&str, Slot) {
    let Some(open) = name.rfind('[') else {
        return (name, Slot::Single);
    };
    let Some(inner) = name[open + 1..].strip_suffix(']') else {
        return (name, Slot::Single);
    };
    let base = &name[..open];
    if base.is_empty() {
        return (name, Slot::Single);
    }
    if inner.is_empty() {
        return (base, Slot::Append);
    }
    if !inner.bytes().all(|b| b.is_ascii_digit()) {
        return (name, Slot::Single);
    }
    match inner.parse::<usize>() {
        Ok(index) if index <= MAX_PART_INDEX => (base, Slot::Index(index)),
        _ => (base, Slot::Append),
    }
}

enum Group {
    Single(RawRecord),
    Multiple(BTreeMap<usize, RawRecord>),
}

/// Collects records part by part and groups them by field, in order of first appearance.
#[derive(Default)]
pub struct FieldGroups {
    groups: Vec<(String, Group)>,
}

impl FieldGroups {
    pub fn push(&mut self, part_name: &str, record: RawRecord) {
        let (field, slot) = parse_part_name(part_name);
        let position = self.groups.iter().position(|(name, _)| name == field);

        match (slot, position) {
            (Slot::Single, Some(pos)) => self.groups[pos].1 = Group::Single(record),
            (Slot::Single, None) => self
                .groups
                .push((field.to_owned(), Group::Single(record))),
            (slot, position) => {
                let pos = position.unwrap_or_else(|| {
                    self.groups
                        .push((field.to_owned(), Group::Multiple(BTreeMap::new())));
                    self.groups.len() - 1
                });
                let group = &mut self.groups[pos].1;
                if let Group::Single(_) = group {
                    *group = Group::Multiple(BTreeMap::new());
                }
                if let Group::Multiple(records) = group {
                    let index = match slot {
                        Slot::Index(index) => Some(index),
                        _ => records
                            .last_key_value()
                            .map_or(Some(0), |(last, _)| last.checked_add(1)),
                    };
                    match index {
                        Some(index) => {
                            records.insert(index, record);
                        }
                        None => tracing::warn!(
                            "part '{part_name}' dropped: no index left in field '{field}'"
                        ),
                    }
                }
            }
        }
    }

    /// Multi-file fields are renumbered from zero, gaps closed.
    #[must_use]
    pub fn into_source(self) -> UploadSource {
        let mut source = UploadSource::new();
        for (field, group) in self.groups {
            let raw = match group {
                Group::Single(record) => RawField::Single(record),
                Group::Multiple(records) => {
                    RawField::Multiple(records.into_values().collect::<ParallelRecords>())
                }
            };
            source.insert(field, raw);
        }
        source
    }
}

/// Upload metadata of one request together with the directory holding its temporary files.
///
/// Dropping it removes every temporary file that was not moved away.
pub struct StagedRequest {
    pub source: UploadSource,
    pub dir: Option<TempDir>,
}

/// Streams every file part of `multipart` into a new temporary directory under `temp_root`
/// and describes the result as an [`UploadSource`].
///
/// Failures of individual files are reported through their error code.
///
/// # Errors
///
/// Fails only when the body is not a readable multipart form at all.
pub async fn stage(
    multipart: &mut Multipart,
    temp_root: &Path,
    max_file_size: u64,
) -> Result<StagedRequest, MultipartError> {
    let dir = tempfile::Builder::new()
        .prefix("upsave-")
        .tempdir_in(temp_root)
        .map_err(|e| {
            tracing::error!(
                "cannot create temporary directory in {}: {e}",
                temp_root.display()
            );
        })
        .ok();

    let mut groups = FieldGroups::default();
    let mut staged = 0usize;
    let mut received = 0usize;
    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if received == 0 => return Err(e),
            Err(e) => {
                tracing::warn!("multipart stream broken after {received} file(s): {e}");
                break;
            }
        };
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let part_name = field.name().unwrap_or_default().to_owned();
        let mime_type = field.content_type().unwrap_or_default().to_owned();

        let record = if file_name.is_empty() {
            failed_record(file_name, String::new(), UploadErrorCode::NoFile)
        } else if let Some(dir) = &dir {
            staged += 1;
            let path = dir.path().join(format!("upload-{staged}"));
            let (size, error) = write_field(&mut field, &path, max_file_size).await;
            if error.is_ok() {
                RawRecord {
                    name: file_name,
                    mime_type,
                    size,
                    tmp_location: path.to_string_lossy().into_owned(),
                    error,
                }
            } else {
                failed_record(file_name, mime_type, error)
            }
        } else {
            failed_record(file_name, mime_type, UploadErrorCode::NoTmpDir)
        };

        tracing::debug!(
            "part '{part_name}' file '{}' staged: {} bytes, error {}",
            record.name,
            record.size,
            record.error
        );
        let broken = record.error == UploadErrorCode::Partial;
        received += 1;
        groups.push(&part_name, record);
        if broken {
            break;
        }
    }

    Ok(StagedRequest {
        source: groups.into_source(),
        dir,
    })
}

fn failed_record(name: String, mime_type: String, error: UploadErrorCode) -> RawRecord {
    RawRecord {
        name,
        mime_type,
        size: 0,
        tmp_location: String::new(),
        error,
    }
}

async fn write_field(field: &mut Field<'_>, path: &Path, max_file_size: u64) -> (u64, UploadErrorCode) {
    let mut file = match File::create(path).await {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("cannot create {}: {e}", path.display());
            return (0, UploadErrorCode::CantWrite);
        }
    };

    let mut size = 0u64;
    let error = loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                size += chunk.len() as u64;
                if size > max_file_size {
                    break UploadErrorCode::IniSize;
                }
                if let Err(e) = file.write_all(&chunk).await {
                    tracing::error!("cannot write {}: {e}", path.display());
                    break UploadErrorCode::CantWrite;
                }
            }
            Ok(None) => match file.flush().await {
                Ok(()) => return (size, UploadErrorCode::Ok),
                Err(e) => {
                    tracing::error!("cannot flush {}: {e}", path.display());
                    break UploadErrorCode::CantWrite;
                }
            },
            Err(e) => {
                tracing::warn!("part read error: {e}");
                break UploadErrorCode::Partial;
            }
        }
    };

    drop(file);
    tokio::fs::remove_file(path).await.unwrap_or_default();
    (0, error)
}
