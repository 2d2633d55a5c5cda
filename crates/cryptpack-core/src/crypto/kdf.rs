//! Password-based key derivation.
//!
//! The salt and iteration count are fixed constants: together with the
//! cipher in [`super::cipher`] they form the implicit version of the archive
//! format. Changing any of them makes existing archives unreadable.

use std::fmt;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use zeroize::Zeroizing;
use zeroize::ZeroizeOnDrop;

use crate::ArchiveError;
use crate::Result;

/// Fixed, non-secret PBKDF2 salt.
pub const KDF_SALT: [u8; 8] = [0x93, 0x1C, 0x56, 0xA4, 0x21, 0xA6, 0x58, 0x98];

/// Fixed PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 10_000;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// Key material derived from a password.
///
/// Holds the AES-256 key and the CBC IV. Both are wiped when the value is
/// dropped, and `Debug` never prints them.
///
/// # Examples
///
/// ```
/// use cryptpack_core::DerivedKey;
///
/// # fn main() -> Result<(), cryptpack_core::ArchiveError> {
/// let first = DerivedKey::derive("hunter2")?;
/// let second = DerivedKey::derive("hunter2")?;
/// assert_eq!(first, second);
/// # Ok(())
/// # }
/// ```
#[derive(ZeroizeOnDrop, PartialEq, Eq)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl DerivedKey {
    /// Derives the key and IV for `password` with PBKDF2-HMAC-SHA256.
    ///
    /// Any string is accepted, including the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::KeyDerivation`] if the PBKDF2 primitive
    /// rejects its parameters.
    pub fn derive(password: &str) -> Result<Self> {
        let mut material = Zeroizing::new([0u8; KEY_LEN + IV_LEN]);

        pbkdf2::<Hmac<Sha256>>(
            password.as_bytes(),
            &KDF_SALT,
            KDF_ITERATIONS,
            &mut material[..],
        )
        .map_err(|e| ArchiveError::KeyDerivation(format!("PBKDF2 failed: {e}")))?;

        let mut key = [0u8; KEY_LEN];
        let mut iv = [0u8; IV_LEN];
        key.copy_from_slice(&material[..KEY_LEN]);
        iv.copy_from_slice(&material[KEY_LEN..]);

        Ok(Self { key, iv })
    }

    pub(crate) const fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub(crate) const fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = DerivedKey::derive("hunter2").unwrap();
        let b = DerivedKey::derive("hunter2").unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.iv(), b.iv());
    }

    #[test]
    fn test_different_passwords_differ() {
        let a = DerivedKey::derive("hunter2").unwrap();
        let b = DerivedKey::derive("Password123").unwrap();
        assert_ne!(a.key(), b.key());
        assert_ne!(a.iv(), b.iv());
    }

    #[test]
    fn test_empty_password_accepted() {
        let key = DerivedKey::derive("").unwrap();
        assert_ne!(key.key(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn test_key_and_iv_are_disjoint_slices() {
        let key = DerivedKey::derive("hunter2").unwrap();
        let mut expected = [0u8; KEY_LEN + IV_LEN];
        pbkdf2::<Hmac<Sha256>>(b"hunter2", &KDF_SALT, KDF_ITERATIONS, &mut expected).unwrap();
        assert_eq!(key.key()[..], expected[..KEY_LEN]);
        assert_eq!(key.iv()[..], expected[KEY_LEN..]);
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = DerivedKey::derive("hunter2").unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "DerivedKey { .. }");
    }

    #[test]
    fn test_unicode_password() {
        let a = DerivedKey::derive("pässwörd ✓").unwrap();
        let b = DerivedKey::derive("passwort").unwrap();
        assert_ne!(a, b);
    }
}
