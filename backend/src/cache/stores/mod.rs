//! Key-value store implementations.
//!
//! - `local`: in-memory, for tests and single-process use
//! - `file`: one file per key under a directory
pub mod file;
pub mod local;

pub use file::FileStore;
pub use local::LocalStore;
