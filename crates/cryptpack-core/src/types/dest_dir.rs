//! Validated output directory type.

use crate::ArchiveError;
use crate::Result;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// A canonical, existing output directory for unpacking.
///
/// Every extracted path is checked against this canonical form, so symlinks
/// in the directory's own path are resolved once up front.
///
/// # Examples
///
/// ```no_run
/// use cryptpack_core::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("decrypted/secrets")?;
/// println!("Unpacking to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Wraps an existing directory after canonicalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the path does not exist, is not a
    /// directory, cannot be canonicalized, or is read-only.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let metadata = std::fs::metadata(&path).map_err(|e| {
            ArchiveError::Io(io::Error::new(
                e.kind(),
                format!("output directory {}: {e}", path.display()),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(ArchiveError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        if metadata.permissions().readonly() {
            return Err(ArchiveError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("directory is not writable: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ArchiveError::Io(io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {e}", path.display()),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Creates the directory and any missing parents, then wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the directory cannot be created or
    /// fails the checks of [`DestDir::new`].
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path).map_err(|e| {
            ArchiveError::Io(io::Error::new(
                e.kind(),
                format!("failed to create output directory {}: {e}", path.display()),
            ))
        })?;
        Self::new(path)
    }

    /// Returns the canonical path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a validated entry path to this directory.
    #[inline]
    #[must_use]
    pub fn join(&self, safe_path: &super::SafePath) -> PathBuf {
        self.0.join(safe_path.as_path())
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dest_dir_valid() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("dest should be valid");
        assert!(dest.as_path().is_absolute());
    }

    #[test]
    fn test_dest_dir_nonexistent() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let result = DestDir::new(temp.path().join("missing"));
        match result {
            Err(ArchiveError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_dest_dir_not_a_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file_path = temp.path().join("file.txt");
        fs::write(&file_path, "test").expect("failed to write file");

        assert!(matches!(DestDir::new(&file_path), Err(ArchiveError::Io(_))));
        assert!(matches!(DestDir::create(&file_path), Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_dest_dir_create_nested() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let nested = temp.path().join("a").join("b").join("c");

        let dest = DestDir::create(&nested).expect("should create nested dirs");
        assert!(nested.is_dir());
        assert_eq!(dest.as_path(), nested.canonicalize().unwrap());

        // idempotent
        assert_eq!(DestDir::create(&nested).unwrap(), dest);
    }

    #[test]
    fn test_dest_dir_canonicalization() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let subdir = temp.path().join("subdir");
        fs::create_dir(&subdir).expect("failed to create subdir");

        let dest = DestDir::new(subdir.join(".").join("..")).expect("should create dest dir");
        assert_eq!(dest.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn test_dest_dir_resolves_symlink() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().expect("failed to create temp dir");
        let real_dir = temp.path().join("real");
        fs::create_dir(&real_dir).expect("failed to create real dir");
        let link = temp.path().join("link");
        symlink(&real_dir, &link).expect("failed to create symlink");

        let dest = DestDir::new(&link).expect("should create from symlink");
        assert_eq!(dest.as_path(), real_dir.canonicalize().unwrap());
        assert_eq!(dest.into_path_buf(), real_dir.canonicalize().unwrap());
    }
}
