//! Byte-counting stream wrappers.
//!
//! `CountingWriter` measures the encrypted archive as it reaches disk;
//! `CountingReader` lets the container writer confirm that an entry's
//! content matched the length announced in its header.

use std::io;
use std::io::Read;
use std::io::Write;

/// Wrapper writer that tracks total bytes written.
///
/// Only successful writes are counted.
///
/// # Examples
///
/// ```
/// use cryptpack_core::io::CountingWriter;
/// use std::io::Write;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(b"Hello, ")?;
/// writer.write_all(b"World!")?;
///
/// assert_eq!(writer.total_bytes(), 13);
/// assert_eq!(writer.into_inner(), b"Hello, World!");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Creates a new counting writer.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Returns the total number of bytes successfully written.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Consumes the counting writer and returns the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Returns a reference to the inner writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }
}

/// Wrapper reader that tracks total bytes read.
///
/// # Examples
///
/// ```
/// use cryptpack_core::io::CountingReader;
/// use std::io::Read;
///
/// let mut reader = CountingReader::new(&b"payload"[..]);
/// let mut out = Vec::new();
/// reader.read_to_end(&mut out)?;
///
/// assert_eq!(reader.total_bytes(), 7);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CountingReader<R> {
    inner: R,
    bytes_read: u64,
}

impl<R> CountingReader<R> {
    /// Creates a new counting reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Returns the total number of bytes read so far.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_read
    }

    /// Consumes the counting reader and returns the inner reader.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes = self.inner.read(buf)?;
        self.bytes_read += bytes as u64;
        Ok(bytes)
    }
}
