//! Password-based encryption of the archive byte stream.
//!
//! The format pairs PBKDF2-HMAC-SHA256 (fixed salt and iteration count) with
//! AES-256-CBC and PKCS#7 padding. There is no header and no authentication
//! tag: a wrong password is only detected when the plaintext fails to
//! decode.

pub mod cipher;
pub mod kdf;
pub mod stream;

pub use cipher::CipherStreamFactory;
pub use kdf::DerivedKey;
pub use stream::DecryptingReader;
pub use stream::EncryptingWriter;
