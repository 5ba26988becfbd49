//! Error types for forge-core

/// Result type for forge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in forge-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem or configuration file error
    #[error(transparent)]
    Fs(#[from] forge_fs::Error),

    /// The model violates one of its invariants
    #[error(transparent)]
    Model(#[from] forge_model::Error),
}
