//! Container codec detection.

/// Gzip member magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Framing of the plaintext container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerCodec {
    /// Uncompressed tar stream.
    Tar,
    /// Gzip-compressed tar stream.
    TarGz,
}

impl ContainerCodec {
    /// Returns the codec written for the given compression level.
    #[must_use]
    pub const fn for_level(level: Option<u8>) -> Self {
        match level {
            Some(_) => Self::TarGz,
            None => Self::Tar,
        }
    }
}

/// Detects the container codec from the first decrypted bytes.
///
/// Anything that does not start with the gzip magic is treated as tar; a
/// wrong password then surfaces as a tar framing error.
#[must_use]
pub fn detect_codec(prefix: &[u8]) -> ContainerCodec {
    if prefix.starts_with(&GZIP_MAGIC) {
        ContainerCodec::TarGz
    } else {
        ContainerCodec::Tar
    }
}
