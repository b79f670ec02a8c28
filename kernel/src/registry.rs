use crate::error::SourceError;
use crate::file::UploadedFile;
use crate::source::{Columns, RawField, RawRecord, UploadSource};

/// Files of one form field.
#[derive(Debug)]
pub enum FieldFiles {
    /// A plain file input
    Single(UploadedFile),
    /// An array style file input, in index order. May be empty.
    Multiple(Vec<UploadedFile>),
}

impl FieldFiles {
    pub fn files(&self) -> std::slice::Iter<'_, UploadedFile> {
        match self {
            FieldFiles::Single(file) => std::slice::from_ref(file).iter(),
            FieldFiles::Multiple(files) => files.iter(),
        }
    }

    pub fn files_mut(&mut self) -> std::slice::IterMut<'_, UploadedFile> {
        match self {
            FieldFiles::Single(file) => std::slice::from_mut(file).iter_mut(),
            FieldFiles::Multiple(files) => files.iter_mut(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            FieldFiles::Single(_) => 1,
            FieldFiles::Multiple(files) => files.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, FieldFiles::Multiple(_))
    }

    #[must_use]
    pub fn as_single(&self) -> Option<&UploadedFile> {
        match self {
            FieldFiles::Single(file) => Some(file),
            FieldFiles::Multiple(_) => None,
        }
    }

    pub fn as_single_mut(&mut self) -> Option<&mut UploadedFile> {
        match self {
            FieldFiles::Single(file) => Some(file),
            FieldFiles::Multiple(_) => None,
        }
    }

    #[must_use]
    pub fn as_multiple(&self) -> Option<&[UploadedFile]> {
        match self {
            FieldFiles::Single(_) => None,
            FieldFiles::Multiple(files) => Some(files),
        }
    }

    pub fn as_multiple_mut(&mut self) -> Option<&mut [UploadedFile]> {
        match self {
            FieldFiles::Single(_) => None,
            FieldFiles::Multiple(files) => Some(files),
        }
    }
}

/// Uploaded files of one request grouped by field, in field order.
#[derive(Debug, Default)]
pub struct Uploads {
    fields: Vec<(String, FieldFiles)>,
}

impl Uploads {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldFiles> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, files)| files)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldFiles> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, files)| files)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldFiles)> {
        self.fields.iter().map(|(name, files)| (name.as_str(), files))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FieldFiles)> {
        self.fields
            .iter_mut()
            .map(|(name, files)| (name.as_str(), files))
    }

    /// Every file with its field name and, for array style fields, its index.
    pub fn files(&self) -> impl Iterator<Item = (&str, Option<usize>, &UploadedFile)> {
        self.fields.iter().flat_map(|(name, files)| {
            let indexed = files.is_multiple();
            files
                .files()
                .enumerate()
                .map(move |(i, file)| (name.as_str(), indexed.then_some(i), file))
        })
    }

    /// Mutable counterpart of [`Uploads::files`], for saving files one by one.
    pub fn files_mut(&mut self) -> impl Iterator<Item = (&str, Option<usize>, &mut UploadedFile)> {
        self.fields.iter_mut().flat_map(|(name, files)| {
            let indexed = files.is_multiple();
            let name = name.as_str();
            files
                .files_mut()
                .enumerate()
                .map(move |(i, file)| (name, indexed.then_some(i), file))
        })
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of files across all fields.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.fields.iter().map(|(_, files)| files.len()).sum()
    }
}

/// Turns field grouped upload metadata into [`UploadedFile`] objects.
pub struct UploadRegistry;

impl UploadRegistry {
    /// Builds one [`UploadedFile`] per record. Single fields yield
    /// [`FieldFiles::Single`], array style fields yield [`FieldFiles::Multiple`]
    /// with one file per index. Failed uploads are kept; they fail only when saved.
    #[must_use]
    pub fn normalize(source: UploadSource) -> Uploads {
        let fields = source
            .into_iter()
            .map(|(name, raw)| {
                let files = match raw {
                    RawField::Single(record) => FieldFiles::Single(UploadedFile::new(record)),
                    RawField::Multiple(records) => {
                        FieldFiles::Multiple(zip_columns(records.into_columns()))
                    }
                };
                (name, files)
            })
            .collect();
        Uploads { fields }
    }

    /// Parses the JSON form of upload metadata (see [`UploadSource::from_json`])
    /// and normalizes it.
    ///
    /// # Errors
    ///
    /// Fails when the JSON is not valid upload metadata.
    pub fn from_json(json: &str) -> Result<Uploads, SourceError> {
        let source = UploadSource::from_json(json)?;
        Ok(Self::normalize(source))
    }
}

fn zip_columns(columns: Columns) -> Vec<UploadedFile> {
    let Columns {
        name,
        mime_type,
        size,
        tmp_location,
        error,
    } = columns;

    error
        .into_iter()
        .zip(mime_type)
        .zip(size)
        .zip(tmp_location)
        .zip(name)
        .map(|((((error, mime_type), size), tmp_location), name)| {
            UploadedFile::new(RawRecord {
                name,
                mime_type,
                size,
                tmp_location,
                error,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::UploadErrorCode;
    use crate::error::UploadError;
    use crate::source::ParallelRecords;
    use rstest::rstest;
    use std::io;
    use std::path::Path;

    fn working(_: &Path, _: &Path) -> io::Result<()> {
        Ok(())
    }

    fn record(name: &str, size: u64, error: i64) -> RawRecord {
        RawRecord {
            name: name.to_owned(),
            mime_type: "image/jpeg".to_owned(),
            size,
            tmp_location: format!("/tmp/{name}"),
            error: UploadErrorCode::from(error),
        }
    }

    #[test]
    fn single_field_yields_single_file() {
        // Arrange
        let json = r#"{ "logo": {"name":"a.png","type":"image/png","size":2048,"tmp_location":"/tmp/x","error":0} }"#;

        // Act
        let mut uploads = UploadRegistry::from_json(json).unwrap();

        // Assert
        assert_eq!(uploads.len(), 1);
        let logo = uploads.get_mut("logo").unwrap().as_single_mut().unwrap();
        assert_eq!(logo.client_name(), "a.png");
        assert_eq!(logo.mime_type(), "image/png");
        assert_eq!(logo.size(), 2048);
        assert_eq!(logo.temp_location(), Path::new("/tmp/x"));
        assert_eq!(logo.error_code(), UploadErrorCode::Ok);

        logo.save("uploaded/a.png", &working).unwrap();
        assert_eq!(logo.saved_path(), Some(Path::new("uploaded/a.png")));
    }

    #[test]
    fn multiple_field_zips_by_index() {
        // Arrange
        let json = r#"{ "photos": {
            "name": ["p0", "p1"],
            "type": ["image/jpeg", "image/jpeg"],
            "size": [100, 200],
            "tmp_location": ["/tmp/0", "/tmp/1"],
            "error": [0, 6]
        } }"#;

        // Act
        let mut uploads = UploadRegistry::from_json(json).unwrap();

        // Assert
        let photos = uploads.get_mut("photos").unwrap().as_multiple_mut().unwrap();
        assert_eq!(photos.len(), 2);
        assert!(photos[0].is_successful());
        assert_eq!(photos[0].client_name(), "p0");
        assert_eq!(photos[0].size(), 100);
        assert_eq!(photos[0].temp_location(), Path::new("/tmp/0"));
        assert_eq!(photos[1].client_name(), "p1");
        assert_eq!(photos[1].size(), 200);
        assert_eq!(photos[1].temp_location(), Path::new("/tmp/1"));
        assert_eq!(photos[1].error_code(), UploadErrorCode::NoTmpDir);

        let result = photos[1].save("uploaded/p1", &working);
        assert!(matches!(result, Err(UploadError::UploadFailed(UploadErrorCode::NoTmpDir))));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(10)]
    #[trace]
    fn multiple_field_keeps_count_and_order(#[case] n: usize) {
        // Arrange
        let records: ParallelRecords = (0..n)
            .map(|i| record(&format!("f{i}"), i as u64, 0))
            .collect();
        let source = UploadSource::new().with_multiple("files", records);

        // Act
        let uploads = UploadRegistry::normalize(source);

        // Assert
        let files = uploads.get("files").unwrap();
        assert!(files.is_multiple());
        assert_eq!(files.len(), n);
        for (i, file) in files.files().enumerate() {
            assert_eq!(file.client_name(), format!("f{i}"));
            assert_eq!(file.size(), i as u64);
        }
    }

    #[test]
    fn empty_multiple_field_is_kept() {
        // Arrange
        let json = r#"{ "photos": {"name":[],"type":[],"size":[],"tmp_location":[],"error":[]} }"#;

        // Act
        let uploads = UploadRegistry::from_json(json).unwrap();

        // Assert
        let photos = uploads.get("photos").unwrap();
        assert_eq!(photos.as_multiple().map(<[UploadedFile]>::len), Some(0));
        assert!(photos.is_empty());
        assert_eq!(uploads.file_count(), 0);
    }

    #[test]
    fn no_file_slots_are_files() {
        // Arrange
        let records: ParallelRecords = vec![record("p0", 10, 0), record("", 0, 4), record("p3", 30, 0)]
            .into_iter()
            .collect();
        let source = UploadSource::new().with_multiple("photos", records);

        // Act
        let uploads = UploadRegistry::normalize(source);

        // Assert
        let errors: Vec<UploadErrorCode> = uploads
            .get("photos")
            .unwrap()
            .files()
            .map(UploadedFile::error_code)
            .collect();
        assert_eq!(
            errors,
            vec![UploadErrorCode::Ok, UploadErrorCode::NoFile, UploadErrorCode::Ok]
        );
    }

    #[test]
    fn empty_source_yields_no_fields() {
        // Act
        let uploads = UploadRegistry::normalize(UploadSource::new());

        // Assert
        assert!(uploads.is_empty());
        assert_eq!(uploads.files().count(), 0);
    }

    #[test]
    fn files_mut_flattens_in_field_order() {
        // Arrange
        let photos: ParallelRecords = vec![record("p0", 1, 0), record("p1", 2, 0)]
            .into_iter()
            .collect();
        let source = UploadSource::new()
            .with_single("logo", record("logo", 5, 0))
            .with_multiple("photos", photos)
            .with_single("document", record("doc", 7, 4));
        let mut uploads = UploadRegistry::normalize(source);

        // Act
        let slots: Vec<(String, Option<usize>, String)> = uploads
            .files_mut()
            .map(|(field, index, file)| (field.to_owned(), index, file.client_name().to_owned()))
            .collect();

        // Assert
        assert_eq!(
            slots,
            vec![
                ("logo".to_owned(), None, "logo".to_owned()),
                ("photos".to_owned(), Some(0), "p0".to_owned()),
                ("photos".to_owned(), Some(1), "p1".to_owned()),
                ("document".to_owned(), None, "doc".to_owned()),
            ]
        );
        assert_eq!(uploads.file_count(), 4);
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        // Arrange
        let photos: ParallelRecords = vec![record("p0", 1, 0), record("p1", 2, 3), record("p2", 3, 0)]
            .into_iter()
            .collect();
        let mut uploads = UploadRegistry::normalize(UploadSource::new().with_multiple("photos", photos));

        // Act
        let outcomes: Vec<bool> = uploads
            .files_mut()
            .map(|(_, _, file)| {
                let destination = format!("uploaded/{}", file.client_name());
                file.save(destination, &working).is_ok()
            })
            .collect();

        // Assert
        assert_eq!(outcomes, vec![true, false, true]);
    }
}
