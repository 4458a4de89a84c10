//! Error types for confidence-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from confidence-core
    #[error(transparent)]
    Core(#[from] confidence_core::Error),

    /// Document failed validation; shown as `reason at path`
    #[error(transparent)]
    Invalid(#[from] confidence_core::ValidationError),

    /// Error from confidence-loader
    #[error(transparent)]
    Loader(#[from] confidence_loader::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
