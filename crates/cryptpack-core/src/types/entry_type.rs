//! Archive entry kind.

/// Kind of an archive entry.
///
/// The container carries regular files and directories only; any other
/// entry type is rejected when the container is read.
///
/// # Examples
///
/// ```
/// use cryptpack_core::EntryKind;
///
/// assert!(EntryKind::File.is_file());
/// assert!(EntryKind::Directory.is_directory());
/// assert_eq!(EntryKind::Directory.to_string(), "directory");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file with content.
    File,

    /// Directory without content.
    Directory,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}
