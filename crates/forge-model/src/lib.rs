//! Structured configuration model for NixForge.
//!
//! The [`ConfigModel`] is the in-memory source of truth that the generator
//! renders to Nix and the importer folds Nix back into. It serializes to the
//! JSON snapshot kept next to the generated files.
//!
//! Identity is by name everywhere: packages, services, sources and users are
//! added only when their name is new and removed by name.

pub mod error;
pub mod model;
pub mod ops;
pub mod option;
pub mod renames;
pub mod value;

pub use error::{Error, Result};
pub use model::{
    Bootloader, ConfigModel, DEFAULT_USERNAME, PackageRef, ServiceEntry, SourceInput,
    SystemProfile, UserProfile,
};
pub use option::{OptionMetadata, OptionType};
pub use renames::Renames;
pub use value::NixValue;
