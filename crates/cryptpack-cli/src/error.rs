//! Error conversion utilities for CLI.
//!
//! Converts cryptpack-core's typed errors (thiserror) into user-facing
//! errors (anyhow) with a hint about what to try next.

use anyhow::anyhow;
use cryptpack_core::ArchiveError;
use cryptpack_core::CipherFailure;
use std::path::Path;

/// Converts an error raised while unpacking `archive`.
pub fn convert_unpack_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::Cipher(CipherFailure::Truncated { length }) => anyhow!(
            "Cannot decrypt '{}': {length} bytes is not a whole number of cipher blocks\n\
             HINT: The archive is truncated or is not a cryptpack archive.",
            archive.display()
        ),
        ArchiveError::Cipher(CipherFailure::BadPadding) | ArchiveError::ArchiveFormat(_) => {
            anyhow!(
                "Cannot decrypt '{}': {err}\n\
                 HINT: Check the password. A wrong password and a corrupted archive look the same.",
                archive.display()
            )
        }
        ArchiveError::PathTraversal { path } => anyhow!(
            "Security violation: Archive '{}' tried to write outside the output directory with '{}'\n\
             HINT: This archive may be malicious. Nothing after this entry was extracted.",
            archive.display(),
            path.display()
        ),
        ArchiveError::SecurityViolation { reason } => anyhow!(
            "Security violation in '{}': {reason}\n\
             HINT: This archive may be malicious. Do not unpack archives from untrusted sources.",
            archive.display()
        ),
        ArchiveError::Io(io_err) if io_err.kind() == std::io::ErrorKind::AlreadyExists => anyhow!(
            "Refusing to overwrite while unpacking '{}': {io_err}\n\
             HINT: Remove the existing file or drop --no-clobber.",
            archive.display()
        ),
        ArchiveError::Io(io_err) => anyhow!(
            "I/O error while unpacking '{}': {io_err}",
            archive.display()
        ),
        ArchiveError::KeyDerivation(_) => anyhow::Error::from(err)
            .context(format!("Error unpacking archive '{}'", archive.display())),
    }
}

/// Converts an error raised while packing into `archive`.
pub fn convert_pack_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::Io(io_err) if io_err.kind() == std::io::ErrorKind::InvalidInput => anyhow!(
            "Cannot create '{}': {io_err}\n\
             HINT: Pack regular files only, and give --name a plain file name.",
            archive.display()
        ),
        ArchiveError::Io(io_err) => anyhow!(
            "I/O error while creating '{}': {io_err}",
            archive.display()
        ),
        ArchiveError::ArchiveFormat(reason) => anyhow!(
            "Cannot add entry to '{}': {reason}\n\
             HINT: Entry names must be relative UTF-8 file names.",
            archive.display()
        ),
        _ => anyhow::Error::from(err)
            .context(format!("Error creating archive '{}'", archive.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_bad_padding_hints_password() {
        let err = ArchiveError::Cipher(CipherFailure::BadPadding);
        let msg = format!("{:?}", convert_unpack_error(err, Path::new("secret.cpk")));
        assert!(msg.contains("secret.cpk"));
        assert!(msg.contains("HINT: Check the password"));
    }

    #[test]
    fn test_convert_empty_archive_hints_password() {
        let msg = format!(
            "{:?}",
            convert_unpack_error(ArchiveError::empty_archive(), Path::new("a.cpk"))
        );
        assert!(msg.contains("empty or failed to decrypt"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_truncated() {
        let err = ArchiveError::Cipher(CipherFailure::Truncated { length: 17 });
        let msg = format!("{:?}", convert_unpack_error(err, Path::new("a.cpk")));
        assert!(msg.contains("17 bytes"));
        assert!(msg.contains("truncated"));
    }

    #[test]
    fn test_convert_path_traversal() {
        let err = ArchiveError::PathTraversal {
            path: PathBuf::from("../../escape.txt"),
        };
        let msg = format!("{:?}", convert_unpack_error(err, Path::new("evil.cpk")));
        assert!(msg.contains("Security violation"));
        assert!(msg.contains("../../escape.txt"));
        assert!(msg.contains("evil.cpk"));
    }

    #[test]
    fn test_convert_no_clobber() {
        let err = ArchiveError::Io(io::Error::new(io::ErrorKind::AlreadyExists, "exists"));
        let msg = format!("{:?}", convert_unpack_error(err, Path::new("a.cpk")));
        assert!(msg.contains("--no-clobber"));
    }

    #[test]
    fn test_convert_pack_io_error() {
        let err = ArchiveError::Io(io::Error::new(io::ErrorKind::NotFound, "missing.txt"));
        let msg = format!("{:?}", convert_pack_error(err, Path::new("out.cpk")));
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("out.cpk"));
    }
}
