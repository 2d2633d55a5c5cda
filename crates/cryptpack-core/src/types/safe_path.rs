//! Validated entry path type for unpacking.

use crate::ArchiveError;
use crate::Result;
use crate::UnpackConfig;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;

/// A normalized relative entry path that resolves inside a [`DestDir`].
///
/// `SafePath` can only be built by [`SafePath::validate`]; there is no
/// `From<PathBuf>` conversion.
///
/// # Examples
///
/// ```no_run
/// use cryptpack_core::DestDir;
/// use cryptpack_core::SafePath;
/// use cryptpack_core::UnpackConfig;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("decrypted")?;
/// let config = UnpackConfig::default();
///
/// let safe = SafePath::validate(Path::new("docs/./notes.txt"), &dest, &config)?;
/// assert_eq!(safe.as_path(), Path::new("docs/notes.txt"));
///
/// assert!(SafePath::validate(Path::new("../etc/passwd"), &dest, &config).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Validates an untrusted entry name against the output directory.
    ///
    /// No filesystem writes happen here. Existing ancestors of the target are
    /// canonicalized, so a symlink planted inside `dest` that points
    /// elsewhere is caught.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::PathTraversal`] if the name is empty, absolute,
    ///   contains `..`, or resolves outside `dest` (including through a
    ///   dangling symlink)
    /// - [`ArchiveError::SecurityViolation`] for null bytes or a depth above
    ///   [`UnpackConfig::max_path_depth`]
    /// - [`ArchiveError::Io`] if an existing ancestor cannot be inspected
    pub fn validate(path: &Path, dest: &DestDir, config: &UnpackConfig) -> Result<Self> {
        if path.as_os_str().as_encoded_bytes().contains(&0) {
            return Err(ArchiveError::SecurityViolation {
                reason: format!("path contains null bytes: {}", path.display()),
            });
        }

        let traversal = || ArchiveError::PathTraversal {
            path: path.to_path_buf(),
        };

        let mut normalized = PathBuf::new();
        let mut depth = 0;
        for component in path.components() {
            match component {
                Component::Normal(part) => {
                    depth += 1;
                    normalized.push(part);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(traversal());
                }
            }
        }

        if depth == 0 {
            return Err(traversal());
        }

        if depth > config.max_path_depth {
            return Err(ArchiveError::SecurityViolation {
                reason: format!(
                    "path depth {depth} exceeds maximum {}",
                    config.max_path_depth
                ),
            });
        }

        let resolved = match resolve_canonical(&dest.as_path().join(&normalized)) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(traversal()),
            Err(e) => {
                return Err(ArchiveError::Io(io::Error::new(
                    e.kind(),
                    format!("failed to resolve {}: {e}", path.display()),
                )));
            }
        };

        if resolved == dest.as_path() || !resolved.starts_with(dest.as_path()) {
            return Err(traversal());
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized relative path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

/// Canonicalizes the deepest existing ancestor of `path` and appends the
/// components that do not exist yet.
///
/// A symlink whose target is missing yields `NotFound`.
fn resolve_canonical(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();

    loop {
        match existing.symlink_metadata() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name);
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
    }

    let mut canonical = existing.canonicalize()?;
    for name in missing.into_iter().rev() {
        canonical.push(name);
    }
    Ok(canonical)
}
