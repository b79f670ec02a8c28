use serde::Deserialize;
use serde_json::{Map, Value};

use crate::code::UploadErrorCode;
use crate::error::SourceError;

/// Metadata of a single uploaded file as reported by the receiving environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    /// Original file name on the client. Untrusted.
    pub name: String,
    /// Client reported MIME type. Advisory only.
    pub mime_type: String,
    pub size: u64,
    /// Server side path of the temporary file
    pub tmp_location: String,
    pub error: UploadErrorCode,
}

/// Five parallel sequences sharing one index space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns {
    pub name: Vec<String>,
    pub mime_type: Vec<String>,
    pub size: Vec<u64>,
    pub tmp_location: Vec<String>,
    pub error: Vec<UploadErrorCode>,
}

/// Metadata of several files submitted under one field, kept in parallel-array form.
///
/// All sequences are guaranteed to have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParallelRecords {
    columns: Columns,
}

impl ParallelRecords {
    /// Validates that every sequence has the same length.
    /// Returns `None` otherwise.
    #[must_use]
    pub fn from_columns(columns: Columns) -> Option<Self> {
        let n = columns.error.len();
        let consistent = columns.name.len() == n
            && columns.mime_type.len() == n
            && columns.size.len() == n
            && columns.tmp_location.len() == n;
        consistent.then_some(Self { columns })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.error.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.error.is_empty()
    }

    #[must_use]
    pub fn into_columns(self) -> Columns {
        self.columns
    }
}

impl FromIterator<RawRecord> for ParallelRecords {
    fn from_iter<T: IntoIterator<Item = RawRecord>>(iter: T) -> Self {
        let mut columns = Columns::default();
        for record in iter {
            columns.name.push(record.name);
            columns.mime_type.push(record.mime_type);
            columns.size.push(record.size);
            columns.tmp_location.push(record.tmp_location);
            columns.error.push(record.error);
        }
        Self { columns }
    }
}

/// Upload metadata of one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawField {
    Single(RawRecord),
    Multiple(ParallelRecords),
}

/// Field grouped upload metadata of one request, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadSource {
    fields: Vec<(String, RawField)>,
}

impl UploadSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. A field that is already present is replaced where it stands.
    pub fn insert(&mut self, field: impl Into<String>, value: RawField) {
        let field = field.into();
        if let Some(slot) = self.fields.iter_mut().find(|(name, _)| *name == field) {
            slot.1 = value;
        } else {
            self.fields.push((field, value));
        }
    }

    #[must_use]
    pub fn with_single(mut self, field: impl Into<String>, record: RawRecord) -> Self {
        self.insert(field, RawField::Single(record));
        self
    }

    #[must_use]
    pub fn with_multiple(mut self, field: impl Into<String>, records: ParallelRecords) -> Self {
        self.insert(field, RawField::Multiple(records));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawField)> {
        self.fields.iter().map(|(field, value)| (field.as_str(), value))
    }

    /// Reads the field grouped JSON form of upload metadata:
    ///
    /// ```json
    /// {
    ///   "logo": { "name": "a.png", "type": "image/png", "size": 2048, "tmp_location": "/tmp/x", "error": 0 },
    ///   "photos": { "name": ["p0", "p1"], "type": ["image/jpeg", "image/jpeg"], "size": [100, 200],
    ///               "tmp_location": ["/tmp/0", "/tmp/1"], "error": [0, 6] }
    /// }
    /// ```
    ///
    /// `tmp_name` is accepted in place of `tmp_location`.
    ///
    /// # Errors
    ///
    /// Fails on invalid JSON, on a field with missing or mistyped keys and on a
    /// multi-file field whose sequences are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let root: Map<String, Value> = serde_json::from_str(json)?;
        let mut source = Self::new();
        for (field, value) in root {
            let wire: WireRecord =
                serde_json::from_value(value).map_err(|source| SourceError::InvalidField {
                    field: field.clone(),
                    source,
                })?;
            let raw = wire.into_field(&field)?;
            source.insert(field, raw);
        }
        Ok(source)
    }
}

impl IntoIterator for UploadSource {
    type Item = (String, RawField);
    type IntoIter = std::vec::IntoIter<(String, RawField)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

#[derive(Deserialize)]
struct WireRecord {
    name: OneOrMany<String>,
    #[serde(rename = "type")]
    mime_type: OneOrMany<String>,
    size: OneOrMany<u64>,
    #[serde(alias = "tmp_name")]
    tmp_location: OneOrMany<String>,
    error: OneOrMany<UploadErrorCode>,
}

impl WireRecord {
    fn into_field(self, field: &str) -> Result<RawField, SourceError> {
        use OneOrMany::{Many, One};

        match (self.error, self.name, self.mime_type, self.size, self.tmp_location) {
            (One(error), One(name), One(mime_type), One(size), One(tmp_location)) => {
                Ok(RawField::Single(RawRecord {
                    name,
                    mime_type,
                    size,
                    tmp_location,
                    error,
                }))
            }
            (Many(error), Many(name), Many(mime_type), Many(size), Many(tmp_location)) => {
                let columns = Columns {
                    name,
                    mime_type,
                    size,
                    tmp_location,
                    error,
                };
                ParallelRecords::from_columns(columns)
                    .map(RawField::Multiple)
                    .ok_or_else(|| SourceError::LengthMismatch {
                        field: field.to_owned(),
                    })
            }
            _ => Err(SourceError::MixedShape {
                field: field.to_owned(),
            }),
        }
    }
}
