//! Storage layer for atomic single-document files.

mod atomic_file;

pub use atomic_file::{AtomicFile, FileFormat, StorageError};
