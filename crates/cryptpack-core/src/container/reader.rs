//! Container deserialization.

use std::io;
use std::io::Read;

use flate2::read::GzDecoder;

use super::detect::ContainerCodec;
use super::detect::GZIP_MAGIC;
use super::detect::detect_codec;
use crate::ArchiveError;
use crate::EntryKind;
use crate::Result;

/// Source with the codec-detection prefix pushed back in front.
type Peeked<R> = io::Chain<io::Cursor<Vec<u8>>, R>;

/// Optional gzip layer between the caller's source and the tar parser.
enum ContainerSource<R: Read> {
    Plain(Peeked<R>),
    Gzip(GzDecoder<Peeked<R>>),
}

impl<R: Read> ContainerSource<R> {
    /// Reads everything left in the decoded and raw streams.
    ///
    /// Draining past the gzip member forces the decrypting source to reach
    /// end of stream and validate its final block.
    fn drain(self) -> io::Result<u64> {
        match self {
            Self::Plain(mut source) => io::copy(&mut source, &mut io::sink()),
            Self::Gzip(mut decoder) => {
                let decoded = io::copy(&mut decoder, &mut io::sink())?;
                let trailing = io::copy(&mut decoder.into_inner(), &mut io::sink())?;
                Ok(decoded + trailing)
            }
        }
    }
}

impl<R: Read> Read for ContainerSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(source) => source.read(buf),
            Self::Gzip(decoder) => decoder.read(buf),
        }
    }
}

/// Reads the first bytes of `source` without losing them.
fn peek_codec<R: Read>(mut source: R) -> Result<(ContainerCodec, Peeked<R>)> {
    let mut prefix = [0u8; GZIP_MAGIC.len()];
    let mut filled = 0;

    while filled < prefix.len() {
        match source.read(&mut prefix[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(ArchiveError::from_read_error(e)),
        }
    }

    let prefix = prefix[..filled].to_vec();
    Ok((detect_codec(&prefix), io::Cursor::new(prefix).chain(source)))
}

/// Decodes a container stream into an ordered sequence of entries.
///
/// The reader is forward-only: entries must be consumed in stream order, and
/// the content of an entry is only available until the next one is requested.
pub struct ArchiveReader<R: Read> {
    archive: tar::Archive<ContainerSource<R>>,
    codec: ContainerCodec,
}

impl<R: Read> ArchiveReader<R> {
    /// Opens a container, selecting the gzip layer from the leading bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Cipher`] if the source is a decrypting stream
    /// over empty or truncated ciphertext.
    pub fn new(source: R) -> Result<Self> {
        let (codec, source) = peek_codec(source)?;
        let source = match codec {
            ContainerCodec::Tar => ContainerSource::Plain(source),
            ContainerCodec::TarGz => ContainerSource::Gzip(GzDecoder::new(source)),
        };

        Ok(Self {
            archive: tar::Archive::new(source),
            codec,
        })
    }

    /// Returns the detected container codec.
    #[must_use]
    pub const fn codec(&self) -> ContainerCodec {
        self.codec
    }

    /// Returns an iterator over the entries of the container.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveFormat`] if iteration was already
    /// started on this reader.
    pub fn entries(&mut self) -> Result<Entries<'_, R>> {
        let inner = self.archive.entries().map_err(ArchiveError::from_read_error)?;
        Ok(Entries {
            inner,
            yielded: 0,
            done: false,
        })
    }

    /// Consumes the rest of the stream so trailing corruption is detected.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Cipher`] for bad padding or truncation and
    /// [`ArchiveError::ArchiveFormat`] for a corrupt gzip trailer.
    pub fn finish(self) -> Result<()> {
        self.archive
            .into_inner()
            .drain()
            .map_err(ArchiveError::from_read_error)?;
        Ok(())
    }
}

impl<R: Read> std::fmt::Debug for ArchiveReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

/// Lazy iterator over container entries.
///
/// Yields an [`ArchiveError::ArchiveFormat`] "empty or failed to decrypt"
/// error if the container ends before its first entry, and stops after the
/// first error.
pub struct Entries<'a, R: 'a + Read> {
    inner: tar::Entries<'a, ContainerSource<R>>,
    yielded: usize,
    done: bool,
}

impl<'a, R: 'a + Read> Iterator for Entries<'a, R> {
    type Item = Result<ArchiveEntry<'a, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = match self.inner.next() {
            None => {
                self.done = true;
                return (self.yielded == 0).then(|| Err(ArchiveError::empty_archive()));
            }
            Some(Err(e)) => Err(ArchiveError::from_read_error(e)),
            Some(Ok(entry)) => ArchiveEntry::from_tar(entry),
        };

        match result {
            Ok(_) => self.yielded += 1,
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

/// One decoded entry. Reading it yields the entry content.
///
/// The name is untrusted and must be validated before it is used as a
/// filesystem path.
pub struct ArchiveEntry<'a, R: 'a + Read> {
    name: String,
    kind: EntryKind,
    size: u64,
    inner: tar::Entry<'a, ContainerSource<R>>,
}

impl<'a, R: 'a + Read> ArchiveEntry<'a, R> {
    fn from_tar(inner: tar::Entry<'a, ContainerSource<R>>) -> Result<Self> {
        let name = String::from_utf8(inner.path_bytes().into_owned()).map_err(|e| {
            ArchiveError::ArchiveFormat(format!(
                "entry name is not valid UTF-8: {}",
                String::from_utf8_lossy(e.as_bytes())
            ))
        })?;

        let entry_type = inner.header().entry_type();
        let kind = if entry_type.is_file() {
            EntryKind::File
        } else if entry_type.is_dir() {
            EntryKind::Directory
        } else {
            return Err(ArchiveError::ArchiveFormat(format!(
                "unsupported entry type {entry_type:?} for {name}"
            )));
        };

        let name = match kind {
            EntryKind::Directory if name.len() > 1 => name.trim_end_matches('/').to_string(),
            _ => name,
        };

        Ok(Self {
            name,
            kind,
            size: inner.size(),
            inner,
        })
    }

    /// Returns the entry name as stored in the container.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the entry is a file or a directory.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the content size announced by the entry header.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

impl<'a, R: 'a + Read> Read for ArchiveEntry<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<'a, R: 'a + Read> std::fmt::Debug for ArchiveEntry<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
