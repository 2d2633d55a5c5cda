//! Bounded-buffer copy from decoded archive entries to the filesystem.
//!
//! Entry content is pulled through the decrypting stream, so a failed read
//! is classified as an archive error (cipher or format) rather than a plain
//! filesystem error. Write failures stay [`ArchiveError::Io`].

use std::io;
use std::io::Read;
use std::io::Write;

use crate::ArchiveError;
use crate::Result;

/// Working buffer size for entry copies (8 KiB).
pub const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Reusable copy buffer shared by every entry of one unpack operation.
///
/// # Examples
///
/// ```
/// use cryptpack_core::copy::CopyBuffer;
/// use cryptpack_core::copy::copy_entry_content;
///
/// let mut buffer = CopyBuffer::new();
/// let mut output = Vec::new();
/// let copied = copy_entry_content(&mut &b"entry bytes"[..], &mut output, &mut buffer)?;
///
/// assert_eq!(copied, 11);
/// assert_eq!(output, b"entry bytes");
/// # Ok::<(), cryptpack_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: [u8; COPY_BUFFER_SIZE],
}

impl CopyBuffer {
    /// Creates a zeroed copy buffer.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        COPY_BUFFER_SIZE
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies an entry's content into `writer`, returning the number of bytes.
///
/// # Errors
///
/// Read failures are classified with [`ArchiveError::from_read_error`], so
/// a bad-padding failure in the decrypting stream surfaces as
/// [`ArchiveError::Cipher`]. Write failures return [`ArchiveError::Io`].
#[inline]
pub fn copy_entry_content<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ArchiveError::from_read_error(e)),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;
        total += bytes_read as u64;
    }

    Ok(total)
}
