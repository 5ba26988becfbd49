//! Nix generation and import for NixForge.
//!
//! - [`render`]: model → canonical `flake.nix`, `configuration.nix` and
//!   `home.nix` text, each wrapping its content in a managed region
//! - [`import`]: managed-region text → model updates, via a line classifier
//!   over a fixed set of statement shapes
//! - [`scanner`]: option metadata extraction from arbitrary module source
//! - [`value`]: Nix literal formatting and reading
//!
//! Nothing here performs I/O, and nothing fails on unexpected Nix: unknown
//! statements are ignored and unparseable option blocks are skipped.

pub mod channel;
pub mod import;
pub mod render;
pub mod scanner;
pub mod value;

pub use import::Importer;
pub use render::{FileKind, Renderer};
pub use scanner::scan_options;
pub use value::{format_value, parse_value, quote};
