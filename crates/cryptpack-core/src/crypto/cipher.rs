//! Cipher stream factory.

use std::io::Read;
use std::io::Write;

use aes::Aes256;
use aes::cipher::KeyInit;

use super::kdf::DerivedKey;
use super::kdf::IV_LEN;
use super::stream::DecryptingReader;
use super::stream::EncryptingWriter;

/// Produces AES-256-CBC (PKCS#7) transform streams for one derived key.
///
/// Every sink or source starts a fresh CBC chain from the derived IV, so one
/// factory can serve both directions of a single operation.
///
/// # Examples
///
/// ```
/// use cryptpack_core::CipherStreamFactory;
/// use cryptpack_core::DerivedKey;
/// use std::io::Read;
/// use std::io::Write;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let factory = CipherStreamFactory::new(&DerivedKey::derive("hunter2")?);
///
/// let mut sink = factory.encrypting_sink(Vec::new());
/// sink.write_all(b"attack at dawn")?;
/// let ciphertext = sink.finish()?;
/// assert_eq!(ciphertext.len(), 16);
///
/// let mut plaintext = Vec::new();
/// factory
///     .decrypting_source(ciphertext.as_slice())
///     .read_to_end(&mut plaintext)?;
/// assert_eq!(plaintext, b"attack at dawn");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CipherStreamFactory {
    cipher: Aes256,
    iv: [u8; IV_LEN],
}

impl CipherStreamFactory {
    /// Initializes the block cipher from derived key material.
    #[must_use]
    pub fn new(key: &DerivedKey) -> Self {
        Self {
            cipher: Aes256::new(key.key().into()),
            iv: *key.iv(),
        }
    }

    /// Wraps `raw` so that bytes written are encrypted before reaching it.
    ///
    /// Call [`EncryptingWriter::finish`] to write the padded final block and
    /// get `raw` back. Dropping the writer without finishing still writes
    /// the final block, ignoring errors.
    pub fn encrypting_sink<W: Write>(&self, raw: W) -> EncryptingWriter<W> {
        EncryptingWriter::new(raw, self.cipher.clone(), self.iv)
    }

    /// Wraps `raw` so that bytes read from it are decrypted.
    pub fn decrypting_source<R: Read>(&self, raw: R) -> DecryptingReader<R> {
        DecryptingReader::new(raw, self.cipher.clone(), self.iv)
    }
}

impl std::fmt::Debug for CipherStreamFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherStreamFactory").finish_non_exhaustive()
    }
}
