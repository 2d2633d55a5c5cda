//! Shared helpers for unit tests.
//!
//! # Panics
//!
//! Helpers panic on I/O errors; they are only compiled for tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::io::Write;

use tempfile::TempDir;

use crate::CipherStreamFactory;
use crate::DerivedKey;
use crate::DestDir;

/// Creates a temporary directory wrapped in a `DestDir`.
///
/// The `TempDir` must outlive the test body.
pub fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = DestDir::new(temp.path()).expect("failed to create dest");
    (temp, dest)
}

/// Cipher factory for `password`.
pub fn factory(password: &str) -> CipherStreamFactory {
    CipherStreamFactory::new(&DerivedKey::derive(password).unwrap())
}

/// Encrypts `plaintext` in one shot.
pub fn encrypt_with(factory: &CipherStreamFactory, plaintext: &[u8]) -> Vec<u8> {
    let mut sink = factory.encrypting_sink(Vec::new());
    sink.write_all(plaintext).unwrap();
    sink.finish().unwrap()
}

/// Builds a plain tar stream with raw entry names.
///
/// Bypasses the path checks of `tar::Header::set_path`, so hostile names such
/// as `../x` or `/etc/passwd` end up in the stream verbatim.
pub fn raw_tar(entries: &[(&[u8], tar::EntryType, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, entry_type, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_entry_type(*entry_type);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, *data).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Builds a plain tar stream holding one entry with a raw name.
pub fn raw_tar_entry(name: &[u8], entry_type: tar::EntryType, data: &[u8]) -> Vec<u8> {
    raw_tar(&[(name, entry_type, data)])
}
