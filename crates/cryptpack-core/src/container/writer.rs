//! Container serialization.

use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;

use flate2::write::GzEncoder;
use tar::Builder;
use tar::EntryType;
use tar::Header;

use super::detect::ContainerCodec;
use crate::ArchiveError;
use crate::PackConfig;
use crate::Result;
use crate::io::CountingReader;

const FILE_MODE: u32 = 0o644;
const DIRECTORY_MODE: u32 = 0o755;

/// Optional gzip layer between the tar builder and the caller's sink.
enum ContainerSink<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> ContainerSink<W> {
    fn new(sink: W, level: Option<u8>) -> Self {
        match level {
            Some(level) => Self::Gzip(GzEncoder::new(sink, compression_level_to_flate2(level))),
            None => Self::Plain(sink),
        }
    }

    fn finish(self) -> io::Result<W> {
        match self {
            Self::Plain(mut sink) => {
                sink.flush()?;
                Ok(sink)
            }
            Self::Gzip(encoder) => encoder.finish(),
        }
    }
}

impl<W: Write> Write for ContainerSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(sink) => sink.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(sink) => sink.flush(),
            Self::Gzip(encoder) => encoder.flush(),
        }
    }
}

fn compression_level_to_flate2(level: u8) -> flate2::Compression {
    match level {
        1..=3 => flate2::Compression::fast(),
        6 => flate2::Compression::default(),
        7..=9 => flate2::Compression::best(),
        n => flate2::Compression::new(u32::from(n)),
    }
}

/// Streams named entries into a tar container, optionally gzip-compressed.
///
/// Entries are appended in call order and each one is self-delimited by its
/// header. [`ArchiveWriter::finish`] must be called to write the end-of-archive
/// marker and the gzip trailer before the sink is closed.
///
/// # Examples
///
/// ```
/// use cryptpack_core::ArchiveReader;
/// use cryptpack_core::ArchiveWriter;
/// use cryptpack_core::PackConfig;
///
/// # fn main() -> Result<(), cryptpack_core::ArchiveError> {
/// let mut writer = ArchiveWriter::new(Vec::new(), &PackConfig::default());
/// writer.write_directory("docs")?;
/// writer.write_file("docs/readme.txt", 5, &b"hello"[..])?;
/// let container = writer.finish()?;
///
/// let mut reader = ArchiveReader::new(container.as_slice())?;
/// let names = reader
///     .entries()?
///     .map(|entry| entry.map(|e| e.name().to_string()))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(names, ["docs", "docs/readme.txt"]);
/// # Ok(())
/// # }
/// ```
pub struct ArchiveWriter<W: Write> {
    builder: Builder<ContainerSink<W>>,
    codec: ContainerCodec,
    entries_written: usize,
}

impl<W: Write> ArchiveWriter<W> {
    /// Begins a container on `sink`.
    ///
    /// The compression level is not validated here; call
    /// [`PackConfig::validate`] first.
    pub fn new(sink: W, config: &PackConfig) -> Self {
        Self {
            builder: Builder::new(ContainerSink::new(sink, config.compression_level)),
            codec: ContainerCodec::for_level(config.compression_level),
            entries_written: 0,
        }
    }

    /// Returns the codec this writer produces.
    #[must_use]
    pub const fn codec(&self) -> ContainerCodec {
        self.codec
    }

    /// Returns the number of entries appended so far.
    #[must_use]
    pub const fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// Appends a regular file entry of exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveFormat`] if `name` is not a valid
    /// relative entry name, and [`ArchiveError::Io`] if `content` fails,
    /// yields fewer or more than `len` bytes, or the sink fails.
    pub fn write_file<R: Read>(&mut self, name: &str, len: u64, content: R) -> Result<()> {
        validate_entry_name(name)?;

        let mut header = new_header(EntryType::Regular, FILE_MODE);
        header.set_size(len);

        let mut counted = CountingReader::new(content.take(len));
        self.builder.append_data(&mut header, name, &mut counted)?;

        let copied = counted.total_bytes();
        if copied != len {
            return Err(ArchiveError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{name}: expected {len} bytes, source ended after {copied}"),
            )));
        }

        let mut rest = counted.into_inner().into_inner();
        if rest.read(&mut [0u8; 1])? != 0 {
            return Err(ArchiveError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{name}: source grew beyond {len} bytes while packing"),
            )));
        }

        self.entries_written += 1;
        Ok(())
    }

    /// Appends a directory entry.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveFormat`] for an invalid name, or
    /// [`ArchiveError::Io`] if the sink fails.
    pub fn write_directory(&mut self, name: &str) -> Result<()> {
        validate_entry_name(name)?;

        let mut header = new_header(EntryType::Directory, DIRECTORY_MODE);
        header.set_size(0);
        self.builder.append_data(&mut header, name, io::empty())?;

        self.entries_written += 1;
        Ok(())
    }

    /// Writes the end-of-archive marker, finalizes compression and returns
    /// the sink.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the trailer cannot be written.
    pub fn finish(self) -> Result<W> {
        let sink = self.builder.into_inner()?;
        Ok(sink.finish()?)
    }
}

impl<W: Write> std::fmt::Debug for ArchiveWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("codec", &self.codec)
            .field("entries_written", &self.entries_written)
            .finish_non_exhaustive()
    }
}

fn new_header(entry_type: EntryType, mode: u32) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_mode(mode);
    header.set_mtime(0);
    header
}

/// Rejects names that could never be extracted safely.
fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ArchiveError::ArchiveFormat(
            "entry name must not be empty".into(),
        ));
    }
    if name.contains('\0') {
        return Err(ArchiveError::ArchiveFormat(format!(
            "entry name contains a null byte: {name:?}"
        )));
    }

    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(ArchiveError::ArchiveFormat(format!(
                    "entry name must not contain '..': {name}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::ArchiveFormat(format!(
                    "entry name must be relative: {name}"
                )));
            }
        }
    }

    Ok(())
}
