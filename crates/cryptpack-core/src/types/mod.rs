//! Type-safe wrappers for unpack operations.
//!
//! `DestDir` and `SafePath` can only be built through validation, so
//! extraction code that holds one has already passed the path checks.

pub mod dest_dir;
pub mod entry_type;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry_type::EntryKind;
pub use safe_path::SafePath;
