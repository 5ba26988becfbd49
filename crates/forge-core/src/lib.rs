//! Sync engine for NixForge
//!
//! `forge-core` is the host side of the generator: it decides where the
//! configuration model comes from, renders and merges the managed files, and
//! writes them back through an injected [`forge_fs::Storage`].
//!
//! ```text
//!                forge-cli
//!                    |
//!                forge-core
//!                    |
//!         +----------+----------+
//!         |                     |
//!     forge-nix              forge-fs
//!         |
//!  forge-model  forge-blocks
//! ```
//!
//! # Example
//!
//! ```
//! use forge_core::{LoadSource, SyncEngine, SyncOptions};
//! use forge_fs::{MemoryStorage, NormalizedPath};
//!
//! let mut engine = SyncEngine::open(MemoryStorage::new(), NormalizedPath::new("/etc/nixforge"))?;
//! let loaded = engine.load()?;
//! assert_eq!(loaded.source, LoadSource::Defaults);
//!
//! let report = engine.sync(&loaded.model, SyncOptions::default())?;
//! assert!(report.success);
//! # Ok::<(), forge_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod sync;

pub use config::{CONFIG_FILE, ForgeConfig};
pub use error::{Error, Result};
pub use sync::{
    CheckReport, CheckStatus, Drift, FileCheck, LoadSource, Loaded, PlannedFile, SyncEngine,
    SyncOptions, SyncReport,
};
