//! Error types for forge-model

/// Result type for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Invariant violations detected by model mutations and validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Source '{name}' is already declared")]
    DuplicateSource { name: String },

    #[error("Source '{name}' is reserved")]
    ReservedSource { name: String },

    #[error("User '{username}' not found")]
    UserNotFound { username: String },

    #[error("User '{username}' already exists")]
    DuplicateUser { username: String },

    #[error("Option '{key}' of service '{service}' is controlled by the service toggle")]
    ReservedOption { service: String, key: String },

    #[error("Service '{name}' not found")]
    ServiceNotFound { name: String },

    #[error("At least one user is required")]
    NoUsers,

    #[error("Username must not be empty")]
    EmptyUsername,
}
