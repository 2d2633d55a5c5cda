//! High-level pack and unpack pipelines.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::time::Instant;

use crate::ArchiveError;
use crate::ArchiveReader;
use crate::ArchiveWriter;
use crate::CipherStreamFactory;
use crate::DerivedKey;
use crate::PackConfig;
use crate::PackReport;
use crate::Result;
use crate::UnpackConfig;
use crate::UnpackReport;
use crate::extraction::SafeExtractor;
use crate::io::CountingWriter;
use crate::types::DestDir;

/// Packs `sources` into the encrypted archive `output_dir/archive_name`.
///
/// Each source becomes one entry named by its file name, in the given order.
/// The archive file is created before the first entry is written, so a
/// failure partway leaves an unusable partial file behind.
///
/// # Arguments
///
/// * `sources` - Regular files to pack
/// * `password` - Password the archive key is derived from
/// * `archive_name` - File name of the archive inside `output_dir`
/// * `output_dir` - Directory for the archive, created if missing
/// * `config` - Container options
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if `sources` is empty, a source is not a
/// regular file or cannot be read, `archive_name` is not a plain file name
/// or names one of the sources,
/// or the archive cannot be written. Returns
/// [`ArchiveError::KeyDerivation`] if the key cannot be derived.
///
/// # Examples
///
/// ```no_run
/// use cryptpack_core::PackConfig;
/// use cryptpack_core::pack;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = pack(
///     &["notes.txt", "photo.jpg"],
///     "hunter2",
///     "backup.cpk",
///     "/tmp/archives",
///     &PackConfig::default(),
/// )?;
/// println!("Packed {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn pack<P: AsRef<Path>, Q: AsRef<Path>>(
    sources: &[P],
    password: &str,
    archive_name: &str,
    output_dir: Q,
    config: &PackConfig,
) -> Result<PackReport> {
    let start = Instant::now();
    config.validate()?;

    if sources.is_empty() {
        return Err(invalid_input("no source files to pack".to_string()));
    }
    validate_archive_name(archive_name)?;

    let factory = CipherStreamFactory::new(&DerivedKey::derive(password)?);

    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir).map_err(|e| with_path(e, output_dir))?;
    let archive_path = output_dir.join(archive_name);
    reject_source_as_target(sources, &archive_path)?;
    let file = File::create(&archive_path).map_err(|e| with_path(e, &archive_path))?;

    let counting = CountingWriter::new(BufWriter::new(file));
    let mut writer = ArchiveWriter::new(factory.encrypting_sink(counting), config);
    let mut report = PackReport::new();

    for source in sources {
        let source = source.as_ref();
        let (name, len, file) = open_source(source)?;
        writer.write_file(name, len, file)?;
        report.files_added += 1;
        report.bytes_read += len;
    }

    let counting = writer.finish()?.finish()?;
    report.archive_size = counting.total_bytes();
    counting.into_inner().flush()?;

    report.duration = start.elapsed();
    Ok(report)
}

/// Unpacks the encrypted archive at `archive` into `output_dir`.
///
/// Entries are validated and written one at a time in stream order. The
/// first failing entry aborts the whole operation; entries written before it
/// are left in place.
///
/// # Errors
///
/// - [`ArchiveError::Cipher`] or [`ArchiveError::ArchiveFormat`] for a wrong
///   password or a corrupted archive (the two cannot be told apart)
/// - [`ArchiveError::PathTraversal`] or [`ArchiveError::SecurityViolation`]
///   for an entry name that would escape `output_dir`
/// - [`ArchiveError::Io`] for filesystem failures
///
/// # Examples
///
/// ```no_run
/// use cryptpack_core::UnpackConfig;
/// use cryptpack_core::unpack;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = unpack(
///     "/tmp/archives/backup.cpk",
///     "hunter2",
///     "decrypted",
///     &UnpackConfig::default(),
/// )?;
/// for name in &report.entries {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn unpack<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    password: &str,
    output_dir: Q,
    config: &UnpackConfig,
) -> Result<UnpackReport> {
    let start = Instant::now();
    let factory = CipherStreamFactory::new(&DerivedKey::derive(password)?);
    let archive = archive.as_ref();
    let file = File::open(archive).map_err(|e| with_path(e, archive))?;
    let dest = DestDir::create(output_dir.as_ref())?;

    let mut reader = ArchiveReader::new(factory.decrypting_source(file))?;
    let mut extractor = SafeExtractor::new(&dest, config);
    let mut report = UnpackReport::new();

    for entry in reader.entries()? {
        extractor.extract(&mut entry?, &mut report)?;
    }
    reader.finish()?;

    report.duration = start.elapsed();
    Ok(report)
}

/// Opens a source file and returns its entry name, length and handle.
fn open_source(source: &Path) -> Result<(&str, u64, File)> {
    let name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            invalid_input(format!(
                "source has no UTF-8 file name: {}",
                source.display()
            ))
        })?;

    let file = File::open(source).map_err(|e| with_path(e, source))?;
    let metadata = file.metadata().map_err(|e| with_path(e, source))?;
    if !metadata.is_file() {
        return Err(invalid_input(format!(
            "source is not a regular file: {}",
            source.display()
        )));
    }

    Ok((name, metadata.len(), file))
}

/// Fails if the archive would be created over one of its own sources.
///
/// Creating the archive truncates the target.
fn reject_source_as_target<P: AsRef<Path>>(sources: &[P], archive_path: &Path) -> Result<()> {
    let Ok(target) = archive_path.canonicalize() else {
        return Ok(());
    };

    for source in sources {
        let source = source.as_ref();
        if source.canonicalize().is_ok_and(|resolved| resolved == target) {
            return Err(invalid_input(format!(
                "archive would overwrite its own source: {}",
                source.display()
            )));
        }
    }
    Ok(())
}

fn validate_archive_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid_input(format!(
            "archive name must be a plain file name: {name:?}"
        ))),
    }
}

fn invalid_input(message: String) -> ArchiveError {
    ArchiveError::Io(io::Error::new(io::ErrorKind::InvalidInput, message))
}

fn with_path(err: io::Error, path: &Path) -> ArchiveError {
    ArchiveError::Io(io::Error::new(
        err.kind(),
        format!("{}: {err}", path.display()),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_pack_rejects_empty_sources() {
        let temp = TempDir::new().unwrap();
        let sources: [&Path; 0] = [];
        let err = pack(&sources, "pw", "a.cpk", temp.path(), &PackConfig::default()).unwrap_err();
        match err {
            ArchiveError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidInput),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(!temp.path().join("a.cpk").exists());
    }

    #[test]
    fn test_pack_rejects_directory_source() {
        let temp = TempDir::new().unwrap();
        let sub = temp.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let err = pack(&[&sub], "pw", "a.cpk", temp.path(), &PackConfig::default()).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn test_pack_rejects_archive_name_with_path() {
        let temp = TempDir::new().unwrap();
        let src = write_source(temp.path(), "a.txt", b"a");
        for name in ["", "../a.cpk", "dir/a.cpk", "/a.cpk", "."] {
            let result = pack(&[&src], "pw", name, temp.path(), &PackConfig::default());
            assert!(matches!(result, Err(ArchiveError::Io(_))), "{name:?}");
        }
    }

    #[test]
    fn test_pack_rejects_invalid_level() {
        let temp = TempDir::new().unwrap();
        let src = write_source(temp.path(), "a.txt", b"a");
        let config = PackConfig::default().with_compression_level(12);
        assert!(pack(&[&src], "pw", "a.cpk", temp.path(), &config).is_err());
    }

    #[test]
    fn test_pack_report_and_output_dir_creation() {
        let temp = TempDir::new().unwrap();
        let a = write_source(temp.path(), "a.txt", b"alpha");
        let b = write_source(temp.path(), "b.bin", &[0u8; 100]);
        let out = temp.path().join("nested/out");

        let report = pack(&[&a, &b], "pw", "x.cpk", &out, &PackConfig::default()).unwrap();
        assert_eq!(report.files_added, 2);
        assert_eq!(report.bytes_read, 105);

        let on_disk = fs::metadata(out.join("x.cpk")).unwrap().len();
        assert_eq!(report.archive_size, on_disk);
        assert_eq!(on_disk % 16, 0);
    }

    #[test]
    fn test_round_trip_uses_file_names_only() {
        let temp = TempDir::new().unwrap();
        let src_dir = temp.path().join("deep/src");
        fs::create_dir_all(&src_dir).unwrap();
        let a = write_source(&src_dir, "a.txt", b"alpha");

        pack(&[&a], "pw", "x.cpk", temp.path(), &PackConfig::default()).unwrap();
        let out = temp.path().join("out");
        let report = unpack(temp.path().join("x.cpk"), "pw", &out, &UnpackConfig::default()).unwrap();

        assert_eq!(report.entries, ["a.txt"]);
        assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"alpha");
    }

    #[test]
    fn test_unpack_missing_archive() {
        let temp = TempDir::new().unwrap();
        let err = unpack(temp.path().join("missing.cpk"), "pw", temp.path(), &UnpackConfig::default())
            .unwrap_err();
        match err {
            ArchiveError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert!(e.to_string().contains("missing.cpk"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unpack_missing_archive_leaves_no_output_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let result = unpack(temp.path().join("missing.cpk"), "pw", &out, &UnpackConfig::default());

        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_pack_refuses_to_overwrite_a_source() {
        let temp = TempDir::new().unwrap();
        let notes = write_source(temp.path(), "notes.txt", b"precious data");
        let other = write_source(temp.path(), "other.txt", b"other");

        let err = pack(&[&other, &notes], "pw", "notes.txt", temp.path(), &PackConfig::default())
            .unwrap_err();
        match err {
            ArchiveError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidInput),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert_eq!(fs::read(&notes).unwrap(), b"precious data");
    }

    #[test]
    fn test_pack_detects_source_reached_through_other_path() {
        let temp = TempDir::new().unwrap();
        let notes = write_source(temp.path(), "notes.txt", b"precious data");
        fs::create_dir(temp.path().join("sub")).unwrap();
        let indirect = temp.path().join("sub/../notes.txt");

        let result = pack(&[&indirect], "pw", "notes.txt", temp.path(), &PackConfig::default());
        assert!(matches!(result, Err(ArchiveError::Io(_))));
        assert_eq!(fs::read(&notes).unwrap(), b"precious data");
    }
}
