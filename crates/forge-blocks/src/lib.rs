//! Managed-region handling for NixForge.
//!
//! Generated Nix files carry a region bounded by two sentinel comment lines:
//!
//! ```text
//! # --- BEGIN NIXFORGE GENERATED ---
//! ...generator-owned content...
//! # --- END NIXFORGE GENERATED ---
//! ```
//!
//! Everything outside the markers belongs to the user. This crate provides:
//!
//! - [`region`]: locating the managed region in a text blob
//! - [`extract`]: string-aware balanced-brace block extraction
//! - [`merge`]: splicing a freshly generated region into an existing file
//!
//! None of these operations fail on malformed input; they report "not found"
//! or fall back to the generated text instead.

pub mod extract;
pub mod merge;
pub mod region;

pub use extract::extract_block;
pub use merge::{collapse_blank_lines, defined_users, merge, remove_user_block};
pub use region::{BEGIN_MARKER, END_MARKER, Region, has_region, locate};
