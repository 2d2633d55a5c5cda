//! Password-protected archives with safe extraction.
//!
//! `cryptpack-core` packs files into a tar container, encrypts the whole
//! container stream with a key derived from a password, and reverses the
//! process while making sure no entry can be written outside the chosen
//! output directory.
//!
//! The layers compose as streams: the cipher wraps the file, the container
//! wraps the cipher. Nothing is buffered beyond a few kilobytes.
//!
//! # Examples
//!
//! ```no_run
//! use cryptpack_core::PackConfig;
//! use cryptpack_core::UnpackConfig;
//! use cryptpack_core::pack;
//! use cryptpack_core::unpack;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! pack(&["report.pdf"], "hunter2", "report.cpk", "out", &PackConfig::default())?;
//!
//! let report = unpack("out/report.cpk", "hunter2", "decrypted", &UnpackConfig::default())?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! The archive carries no authentication tag. A wrong password is detected
//! only because the decrypted bytes fail to decode, and a tampered archive
//! may decode into different content. Use an authenticated format when
//! integrity matters.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod container;
pub mod copy;
pub mod crypto;
pub mod error;
pub mod extraction;
pub mod io;
pub mod report;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::pack;
pub use api::unpack;
pub use config::PackConfig;
pub use config::UnpackConfig;
pub use container::ArchiveEntry;
pub use container::ArchiveReader;
pub use container::ArchiveWriter;
pub use container::ContainerCodec;
pub use crypto::CipherStreamFactory;
pub use crypto::DecryptingReader;
pub use crypto::DerivedKey;
pub use crypto::EncryptingWriter;
pub use error::ArchiveError;
pub use error::CipherFailure;
pub use error::PackError;
pub use error::Result;
pub use error::UnpackError;
pub use extraction::SafeExtractor;
pub use extraction::extract_entry;
pub use report::PackReport;
pub use report::UnpackReport;
pub use types::DestDir;
pub use types::EntryKind;
pub use types::SafePath;
