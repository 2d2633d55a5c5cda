//! Safe materialization of decoded entries.
//!
//! Every entry name is validated with [`SafePath::validate`] before anything
//! is written for it. A rejected entry aborts the unpack; entries written
//! before it stay on disk.

use std::fs::File;
use std::fs::OpenOptions;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::ArchiveEntry;
use crate::ArchiveError;
use crate::EntryKind;
use crate::Result;
use crate::UnpackConfig;
use crate::UnpackReport;
use crate::copy::CopyBuffer;
use crate::copy::copy_entry_content;
use crate::types::DestDir;
use crate::types::SafePath;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Writes entries below one output directory.
///
/// Holds the copy buffer reused across all entries of an unpack.
#[derive(Debug)]
pub struct SafeExtractor<'a> {
    dest: &'a DestDir,
    config: &'a UnpackConfig,
    buffer: CopyBuffer,
}

impl<'a> SafeExtractor<'a> {
    /// Creates an extractor for `dest`.
    #[must_use]
    pub const fn new(dest: &'a DestDir, config: &'a UnpackConfig) -> Self {
        Self {
            dest,
            config,
            buffer: CopyBuffer::new(),
        }
    }

    /// Validates and materializes one entry, recording it in `report`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::PathTraversal`] / [`ArchiveError::SecurityViolation`]
    ///   if the name fails validation; nothing is written in that case
    /// - [`ArchiveError::Cipher`] / [`ArchiveError::ArchiveFormat`] if the
    ///   content cannot be decoded
    /// - [`ArchiveError::Io`] if the filesystem write fails
    pub fn extract<R: Read>(
        &mut self,
        entry: &mut ArchiveEntry<'_, R>,
        report: &mut UnpackReport,
    ) -> Result<()> {
        let name = entry.name().to_string();
        let kind = entry.kind();
        let size = entry.size();
        self.materialize(&name, kind, size, entry, report)
    }

    pub(crate) fn materialize<C: Read>(
        &mut self,
        name: &str,
        kind: EntryKind,
        size: u64,
        content: &mut C,
        report: &mut UnpackReport,
    ) -> Result<()> {
        let safe_path = SafePath::validate(Path::new(name), self.dest, self.config)?;

        match kind {
            EntryKind::Directory => create_directory(&safe_path, self.dest, report)?,
            EntryKind::File => {
                let written = extract_file(
                    content,
                    &safe_path,
                    self.dest,
                    self.config,
                    report,
                    &mut self.buffer,
                )?;
                if written != size {
                    return Err(ArchiveError::ArchiveFormat(format!(
                        "entry {name} is truncated: expected {size} bytes, got {written}"
                    )));
                }
            }
        }

        report.entries.push(name.to_string());
        Ok(())
    }
}

/// Validates and materializes one entry below `dest`.
///
/// Convenience wrapper around [`SafeExtractor`] for single entries.
///
/// # Errors
///
/// See [`SafeExtractor::extract`].
pub fn extract_entry<R: Read>(
    entry: &mut ArchiveEntry<'_, R>,
    dest: &DestDir,
    config: &UnpackConfig,
    report: &mut UnpackReport,
) -> Result<()> {
    SafeExtractor::new(dest, config).extract(entry, report)
}

/// Creates a directory entry and any missing parents.
///
/// Succeeds if the directory already exists.
fn create_directory(safe_path: &SafePath, dest: &DestDir, report: &mut UnpackReport) -> Result<()> {
    create_dir_all(dest.join(safe_path))?;
    report.directories_created += 1;
    Ok(())
}

/// Streams file content to disk, returning the bytes written.
fn extract_file<C: Read>(
    content: &mut C,
    safe_path: &SafePath,
    dest: &DestDir,
    config: &UnpackConfig,
    report: &mut UnpackReport,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let output_path = dest.join(safe_path);

    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }

    let output_file = if config.overwrite {
        File::create(&output_path)?
    } else {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&output_path)?
    };

    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, output_file);
    let bytes_written = copy_entry_content(content, &mut writer, buffer)?;
    writer.flush()?;

    report.files_extracted += 1;
    report.bytes_written += bytes_written;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveReader;
    use crate::test_utils::create_test_dest;
    use crate::test_utils::raw_tar;
    use std::fs;
    use std::io;

    fn materialize(
        dest: &DestDir,
        config: &UnpackConfig,
        name: &str,
        kind: EntryKind,
        data: &[u8],
        report: &mut UnpackReport,
    ) -> Result<()> {
        SafeExtractor::new(dest, config).materialize(
            name,
            kind,
            data.len() as u64,
            &mut &data[..],
            report,
        )
    }

    #[test]
    fn test_extract_file_creates_parents() {
        let (_temp, dest) = create_test_dest();
        let mut report = UnpackReport::new();

        materialize(&dest, &UnpackConfig::default(), "a/b/c.txt", EntryKind::File, b"hello", &mut report)
            .unwrap();

        assert_eq!(fs::read(dest.as_path().join("a/b/c.txt")).unwrap(), b"hello");
        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.bytes_written, 5);
        assert_eq!(report.entries, ["a/b/c.txt"]);
    }

    #[test]
    fn test_extract_directory_is_not_a_file() {
        let (_temp, dest) = create_test_dest();
        let mut report = UnpackReport::new();

        materialize(&dest, &UnpackConfig::default(), "docs", EntryKind::Directory, b"", &mut report)
            .unwrap();
        // existing directory is fine
        materialize(&dest, &UnpackConfig::default(), "docs", EntryKind::Directory, b"", &mut report)
            .unwrap();

        assert!(dest.as_path().join("docs").is_dir());
        assert_eq!(report.directories_created, 2);
        assert_eq!(report.files_extracted, 0);
    }

    #[test]
    fn test_directory_over_existing_file_fails() {
        let (_temp, dest) = create_test_dest();
        fs::write(dest.as_path().join("docs"), b"file").unwrap();

        let err = materialize(
            &dest,
            &UnpackConfig::default(),
            "docs",
            EntryKind::Directory,
            b"",
            &mut UnpackReport::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn test_overwrite_existing_file() {
        let (_temp, dest) = create_test_dest();
        fs::write(dest.as_path().join("a.txt"), b"old content").unwrap();

        materialize(&dest, &UnpackConfig::default(), "a.txt", EntryKind::File, b"new", &mut UnpackReport::new())
            .unwrap();
        assert_eq!(fs::read(dest.as_path().join("a.txt")).unwrap(), b"new");
    }

    #[test]
    fn test_no_clobber_keeps_existing_file() {
        let (_temp, dest) = create_test_dest();
        fs::write(dest.as_path().join("a.txt"), b"old").unwrap();
        let config = UnpackConfig::default().with_overwrite(false);

        let err = materialize(&dest, &config, "a.txt", EntryKind::File, b"new", &mut UnpackReport::new())
            .unwrap_err();
        match err {
            ArchiveError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        assert_eq!(fs::read(dest.as_path().join("a.txt")).unwrap(), b"old");
    }

    #[test]
    fn test_traversal_writes_nothing() {
        let (temp, dest) = create_test_dest();
        let inner = dest.as_path().join("inner");
        fs::create_dir(&inner).unwrap();
        let inner_dest = DestDir::new(&inner).unwrap();
        let mut report = UnpackReport::new();

        let err = materialize(
            &inner_dest,
            &UnpackConfig::default(),
            "../escape.txt",
            EntryKind::File,
            b"pwned",
            &mut report,
        )
        .unwrap_err();

        assert!(matches!(err, ArchiveError::PathTraversal { .. }));
        assert!(!temp.path().join("escape.txt").exists());
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_short_content_is_format_error() {
        let (_temp, dest) = create_test_dest();
        let err = SafeExtractor::new(&dest, &UnpackConfig::default())
            .materialize("a.txt", EntryKind::File, 10, &mut &b"abc"[..], &mut UnpackReport::new())
            .unwrap_err();
        assert!(matches!(err, ArchiveError::ArchiveFormat(_)));
    }

    #[test]
    fn test_extract_entry_from_reader() {
        let (_temp, dest) = create_test_dest();
        let data = raw_tar(&[
            (b"dir", tar::EntryType::Directory, b""),
            (b"dir/file.txt", tar::EntryType::Regular, b"content"),
        ]);
        let mut reader = ArchiveReader::new(data.as_slice()).unwrap();
        let mut report = UnpackReport::new();

        for entry in reader.entries().unwrap() {
            let mut entry = entry.unwrap();
            extract_entry(&mut entry, &dest, &UnpackConfig::default(), &mut report).unwrap();
        }

        assert_eq!(report.entries, ["dir", "dir/file.txt"]);
        assert_eq!(report.total_items(), 2);
        assert_eq!(fs::read(dest.as_path().join("dir/file.txt")).unwrap(), b"content");
    }
}
