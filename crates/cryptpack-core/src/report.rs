//! Pack and unpack operation reporting.

use std::time::Duration;

/// Report of a successful pack operation.
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Number of files written into the archive.
    pub files_added: usize,

    /// Total bytes read from the source files.
    pub bytes_read: u64,

    /// Size of the encrypted archive on disk.
    pub archive_size: u64,

    /// Duration of the pack operation.
    pub duration: Duration,
}

impl PackReport {
    /// Creates a new empty pack report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the archive size relative to the source bytes.
    ///
    /// Returns `0.0` when nothing was read.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_ratio(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        self.archive_size as f64 / self.bytes_read as f64
    }
}

/// Report of a successful unpack operation.
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Number of files extracted.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Entry names in the order they appeared in the archive.
    pub entries: Vec<String>,

    /// Duration of the unpack operation.
    pub duration: Duration,
}

impl UnpackReport {
    /// Creates a new empty unpack report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of entries processed.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}
