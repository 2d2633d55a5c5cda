//! I/O utilities shared by the pack and unpack pipelines.

pub mod counting;

pub use counting::CountingReader;
pub use counting::CountingWriter;
