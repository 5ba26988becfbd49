//! Filesystem access for NixForge
//!
//! Provides path handling, atomic writes and the injectable [`Storage`]
//! capability the sync engine performs all of its I/O through.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod storage;

pub use checksum::compute_content_checksum;
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use storage::{LocalStorage, MemoryStorage, Storage};
