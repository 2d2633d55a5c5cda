//! Error types for pack and unpack operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Error returned by [`pack`](crate::pack).
pub type PackError = ArchiveError;

/// Error returned by [`unpack`](crate::unpack).
pub type UnpackError = ArchiveError;

/// Message reported when a decrypted container yields no entries.
pub const EMPTY_ARCHIVE_MESSAGE: &str = "archive is empty or failed to decrypt (check the password)";

/// Malformed ciphertext detected by the decrypting stream.
///
/// These travel inside `std::io::Error` while the plaintext is consumed
/// through `Read`, and are recovered as [`ArchiveError::Cipher`] by the
/// container layer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherFailure {
    /// Ciphertext is empty or not a multiple of the cipher block size.
    #[error("ciphertext length {length} is not a positive multiple of the block size")]
    Truncated {
        /// Number of ciphertext bytes read before end of stream.
        length: u64,
    },

    /// Final block padding is malformed.
    #[error("invalid block padding")]
    BadPadding,
}

impl From<CipherFailure> for io::Error {
    fn from(failure: CipherFailure) -> Self {
        Self::new(io::ErrorKind::InvalidData, failure)
    }
}

/// Errors that can occur while packing or unpacking an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The key derivation primitive failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Ciphertext is truncated or its padding is malformed.
    ///
    /// Wrong password and corrupted archive are indistinguishable here.
    #[error("decryption failed: {0}")]
    Cipher(CipherFailure),

    /// The decrypted container is malformed or empty.
    #[error("invalid archive: {0}")]
    ArchiveFormat(String),

    /// An entry name resolves outside the output directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry name.
        path: PathBuf,
    },

    /// Operation not permitted by the extraction policy.
    #[error("operation denied by security policy: {reason}")]
    SecurityViolation {
        /// Reason for the violation.
        reason: String,
    },
}

impl ArchiveError {
    /// Returns the error reported for a container without entries.
    #[must_use]
    pub fn empty_archive() -> Self {
        Self::ArchiveFormat(EMPTY_ARCHIVE_MESSAGE.to_string())
    }

    /// Converts an I/O error raised while reading decoded archive data.
    ///
    /// Cipher failures carried inside the error are unwrapped, framing and
    /// decompression failures become [`ArchiveError::ArchiveFormat`], and
    /// everything else stays an I/O error.
    #[must_use]
    pub fn from_read_error(err: io::Error) -> Self {
        if let Some(failure) = err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<CipherFailure>())
        {
            return Self::Cipher(*failure);
        }

        match err.kind() {
            io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::Other => Self::ArchiveFormat(err.to_string()),
            _ => Self::Io(err),
        }
    }

    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptpack_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    /// assert!(!ArchiveError::empty_archive().is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::SecurityViolation { .. }
        )
    }

    /// Returns `true` if the archive could not be decoded.
    ///
    /// This is the only signal of a wrong password: the format carries no
    /// authentication tag, so a bad password shows up as either a cipher
    /// failure or a malformed container.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptpack_core::ArchiveError;
    /// use cryptpack_core::CipherFailure;
    ///
    /// assert!(ArchiveError::Cipher(CipherFailure::BadPadding).is_decode_failure());
    /// assert!(ArchiveError::empty_archive().is_decode_failure());
    /// ```
    #[must_use]
    pub const fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Cipher(_) | Self::ArchiveFormat(_))
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::ArchiveFormat(msg) | Self::KeyDerivation(msg) => Some(msg),
            Self::SecurityViolation { reason } => Some(reason),
            _ => None,
        }
    }
}
