//! Entry framing for the plaintext stream.
//!
//! The container is a GNU tar stream, gzip-compressed unless packing was
//! configured without compression. It has no index: entries are written and
//! read strictly in order.

pub mod detect;
pub mod reader;
pub mod writer;

pub use detect::ContainerCodec;
pub use reader::ArchiveEntry;
pub use reader::ArchiveReader;
pub use reader::Entries;
pub use writer::ArchiveWriter;
