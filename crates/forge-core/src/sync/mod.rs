//! Load, plan, sync and check of the managed file set.

mod check;
mod engine;

pub use check::{CheckReport, CheckStatus, Drift, FileCheck};
pub use engine::{LoadSource, Loaded, PlannedFile, SyncEngine, SyncOptions, SyncReport};
