//! Streaming AES-256-CBC transforms with PKCS#7 padding.
//!
//! Both wrappers work through a bounded buffer of [`WORK_BUFFER_SIZE`]
//! bytes regardless of the stream length.

use std::io;
use std::io::Read;
use std::io::Write;

use aes::Aes256;
use aes::Block;
use aes::cipher::BlockDecrypt;
use aes::cipher::BlockEncrypt;

use crate::CipherFailure;

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Size of the working buffer used by the stream wrappers (4 KiB).
pub const WORK_BUFFER_SIZE: usize = 256 * BLOCK_SIZE;

/// Writer that encrypts everything written to it.
///
/// Created by [`CipherStreamFactory::encrypting_sink`](super::CipherStreamFactory::encrypting_sink).
pub struct EncryptingWriter<W: Write> {
    inner: Option<W>,
    cipher: Aes256,
    chain: [u8; BLOCK_SIZE],
    pending: [u8; BLOCK_SIZE],
    pending_len: usize,
    scratch: Vec<u8>,
    finished: bool,
}

impl<W: Write> EncryptingWriter<W> {
    pub(crate) fn new(inner: W, cipher: Aes256, iv: [u8; BLOCK_SIZE]) -> Self {
        Self {
            inner: Some(inner),
            cipher,
            chain: iv,
            pending: [0u8; BLOCK_SIZE],
            pending_len: 0,
            scratch: Vec::with_capacity(WORK_BUFFER_SIZE),
            finished: false,
        }
    }

    /// Writes the padded final block, flushes, and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the final block or flushing fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.finalize()?;
        self.inner.take().ok_or_else(finished_error)
    }

    /// Returns a reference to the inner writer.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    fn seal_pending(&mut self) {
        let mut block = Block::from(self.pending);
        for (byte, prev) in block.iter_mut().zip(self.chain.iter()) {
            *byte ^= prev;
        }
        self.cipher.encrypt_block(&mut block);
        self.chain.copy_from_slice(&block);
        self.pending_len = 0;
    }

    fn finalize(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        #[allow(clippy::cast_possible_truncation)]
        let pad = (BLOCK_SIZE - self.pending_len) as u8;
        self.pending[self.pending_len..].fill(pad);
        self.seal_pending();

        let inner = self.inner.as_mut().ok_or_else(finished_error)?;
        inner.write_all(&self.chain)?;
        inner.flush()
    }
}

impl<W: Write> Write for EncryptingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(finished_error());
        }

        let accepted = buf.len().min(WORK_BUFFER_SIZE);
        let mut input = &buf[..accepted];
        self.scratch.clear();

        while !input.is_empty() {
            let take = (BLOCK_SIZE - self.pending_len).min(input.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&input[..take]);
            self.pending_len += take;
            input = &input[take..];

            if self.pending_len == BLOCK_SIZE {
                self.seal_pending();
                self.scratch.extend_from_slice(&self.chain);
            }
        }

        if !self.scratch.is_empty() {
            let inner = self.inner.as_mut().ok_or_else(finished_error)?;
            inner.write_all(&self.scratch)?;
        }
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for EncryptingWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.finalize();
        }
    }
}

/// Reader that decrypts the ciphertext read from the inner reader.
///
/// The last ciphertext block is held back until the inner reader reaches
/// end of stream, then its padding is checked and stripped. Truncated
/// ciphertext or bad padding surface as an `InvalidData` I/O error carrying
/// a [`CipherFailure`].
///
/// Created by [`CipherStreamFactory::decrypting_source`](super::CipherStreamFactory::decrypting_source).
pub struct DecryptingReader<R: Read> {
    inner: R,
    cipher: Aes256,
    chain: [u8; BLOCK_SIZE],
    input: Vec<u8>,
    plain: Vec<u8>,
    plain_pos: usize,
    total_read: u64,
    done: bool,
    failure: Option<CipherFailure>,
}

impl<R: Read> DecryptingReader<R> {
    pub(crate) fn new(inner: R, cipher: Aes256, iv: [u8; BLOCK_SIZE]) -> Self {
        Self {
            inner,
            cipher,
            chain: iv,
            input: Vec::with_capacity(WORK_BUFFER_SIZE + BLOCK_SIZE),
            plain: Vec::with_capacity(WORK_BUFFER_SIZE),
            plain_pos: 0,
            total_read: 0,
            done: false,
            failure: None,
        }
    }

    /// Returns a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwraps this reader, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decrypts the next chunk into `plain`, or finishes the stream.
    fn fill(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; WORK_BUFFER_SIZE];
        let read = loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        };

        if read == 0 {
            return self.finish_stream();
        }

        self.total_read += read as u64;
        self.input.extend_from_slice(&chunk[..read]);

        // Keep the trailing partial block, or the last full block when the
        // input is block aligned: it may be the padded final block.
        let ready = (self.input.len() - 1) / BLOCK_SIZE * BLOCK_SIZE;
        for ciphertext in self.input[..ready].chunks_exact(BLOCK_SIZE) {
            open_block(&self.cipher, &mut self.chain, ciphertext, &mut self.plain);
        }
        self.input.drain(..ready);
        Ok(())
    }

    fn finish_stream(&mut self) -> io::Result<()> {
        self.done = true;

        if self.input.len() != BLOCK_SIZE {
            return Err(self.fail(CipherFailure::Truncated {
                length: self.total_read,
            }));
        }

        let start = self.plain.len();
        open_block(&self.cipher, &mut self.chain, &self.input, &mut self.plain);
        self.input.clear();

        let pad = usize::from(self.plain[self.plain.len() - 1]);
        let padding_ok = (1..=BLOCK_SIZE).contains(&pad)
            && self.plain[self.plain.len() - pad..]
                .iter()
                .all(|&b| usize::from(b) == pad);
        if !padding_ok {
            self.plain.truncate(start);
            return Err(self.fail(CipherFailure::BadPadding));
        }

        let len = self.plain.len() - pad;
        self.plain.truncate(len);
        Ok(())
    }

    fn fail(&mut self, failure: CipherFailure) -> io::Error {
        self.failure = Some(failure);
        failure.into()
    }
}

impl<R: Read> Read for DecryptingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.plain_pos == self.plain.len() {
            if let Some(failure) = self.failure {
                return Err(failure.into());
            }
            if self.done {
                return Ok(0);
            }
            self.plain.clear();
            self.plain_pos = 0;
            self.fill()?;
        }

        let available = &self.plain[self.plain_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.plain_pos += n;
        Ok(n)
    }
}

/// CBC-decrypts one block onto the end of `plain` and advances the chain.
fn open_block(
    cipher: &Aes256,
    chain: &mut [u8; BLOCK_SIZE],
    ciphertext: &[u8],
    plain: &mut Vec<u8>,
) {
    let mut block = Block::clone_from_slice(ciphertext);
    cipher.decrypt_block(&mut block);
    for (byte, prev) in block.iter_mut().zip(chain.iter()) {
        *byte ^= prev;
    }
    chain.copy_from_slice(ciphertext);
    plain.extend_from_slice(&block);
}

fn finished_error() -> io::Error {
    io::Error::other("encrypting stream already finished")
}
