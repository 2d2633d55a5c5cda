//! Configuration for pack and unpack operations.
//!
//! Neither configuration influences key derivation: the salt, iteration
//! count and cipher are fixed by the archive format.

use std::io;

use crate::ArchiveError;
use crate::Result;

/// Configuration for [`pack`](crate::pack).
///
/// # Examples
///
/// ```
/// use cryptpack_core::PackConfig;
///
/// // gzip level 6
/// let config = PackConfig::default();
/// assert_eq!(config.compression_level, Some(6));
///
/// // plain tar inside the cipher stream
/// let stored = PackConfig::default().without_compression();
/// assert_eq!(stored.compression_level, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Gzip level for the container (1-9).
    ///
    /// `None` stores an uncompressed tar stream.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
        }
    }
}

impl PackConfig {
    /// Creates a new `PackConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gzip compression level.
    ///
    /// Out-of-range levels are reported by [`PackConfig::validate`].
    #[must_use]
    pub const fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Disables gzip compression of the container.
    #[must_use]
    pub const fn without_compression(mut self) -> Self {
        self.compression_level = None;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] with kind `InvalidInput` if the
    /// compression level is set but not in range 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("compression level must be 1-9, got {level}"),
            )));
        }
        Ok(())
    }
}

/// Configuration for [`unpack`](crate::unpack).
///
/// # Examples
///
/// ```
/// use cryptpack_core::UnpackConfig;
///
/// let config = UnpackConfig::default()
///     .with_max_path_depth(8)
///     .with_overwrite(false);
/// assert_eq!(config.max_path_depth, 8);
/// assert!(!config.overwrite);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackConfig {
    /// Maximum number of components in an entry name.
    ///
    /// Default: `32`.
    pub max_path_depth: usize,

    /// Replace files that already exist in the output directory.
    ///
    /// When `false`, an existing file aborts the unpack with an
    /// `AlreadyExists` I/O error.
    ///
    /// Default: `true`.
    pub overwrite: bool,
}

impl Default for UnpackConfig {
    fn default() -> Self {
        Self {
            max_path_depth: 32,
            overwrite: true,
        }
    }
}

impl UnpackConfig {
    /// Creates a new `UnpackConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum entry name depth.
    #[must_use]
    pub const fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    /// Sets whether existing files are overwritten.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
