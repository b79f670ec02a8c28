use std::fs;
use std::io;
use std::path::Path;

/// Moves a file from its temporary location to a destination path.
///
/// Implementations either move the file completely or leave the source untouched
/// and report the failure.
pub trait Mover {
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

impl<F> Mover for F
where
    F: Fn(&Path, &Path) -> io::Result<()>,
{
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        self(from, to)
    }
}

/// Filesystem mover. Renames, and copies across devices.
///
/// Destination directories are never created.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl Mover for FsMover {
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_and_remove(from, to),
            Err(e) => Err(e),
        }
    }
}

fn copy_and_remove(from: &Path, to: &Path) -> io::Result<()> {
    let result = fs::copy(from, to).and_then(|_| fs::remove_file(from));
    if result.is_err() {
        discard_copy(to);
    }
    result
}

fn discard_copy(to: &Path) {
    match fs::remove_file(to) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("cannot remove incomplete copy {}: {e}", to.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rename_moves_content() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("upload.tmp");
        let to = dir.path().join("saved.txt");
        fs::write(&from, b"content").unwrap();

        // Act
        let result = FsMover.move_file(&from, &to);

        // Assert
        assert!(result.is_ok());
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"content");
    }

    #[test]
    fn missing_destination_dir_fails_and_keeps_source() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("upload.tmp");
        let to = dir.path().join("missing").join("saved.txt");
        fs::write(&from, b"content").unwrap();

        // Act
        let result = FsMover.move_file(&from, &to);

        // Assert
        assert!(result.is_err());
        assert!(from.exists());
        assert!(!to.exists());
    }

    #[test]
    fn missing_source_fails() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("gone.tmp");
        let to = dir.path().join("saved.txt");

        // Act
        let result = FsMover.move_file(&from, &to);

        // Assert
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn copy_and_remove_moves_content() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("upload.tmp");
        let to = dir.path().join("saved.txt");
        fs::write(&from, b"content").unwrap();

        // Act
        let result = copy_and_remove(&from, &to);

        // Assert
        assert!(result.is_ok());
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"content");
    }

    #[test]
    fn copy_and_remove_failed_copy_leaves_no_destination() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("upload.tmp");
        fs::create_dir(&from).unwrap();
        let to = dir.path().join("saved.txt");

        // Act
        let result = copy_and_remove(&from, &to);

        // Assert
        assert!(result.is_err());
        assert!(from.exists());
        assert!(!to.exists());
    }

    #[test]
    fn closure_is_mover() {
        // Arrange
        let mover = |_: &Path, _: &Path| -> io::Result<()> { Err(io::Error::other("disk full")) };

        // Act
        let result = mover.move_file(Path::new("/a"), Path::new("/b"));

        // Assert
        assert_eq!(result.unwrap_err().to_string(), "disk full");
    }
}
