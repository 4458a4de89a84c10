//! Error types for confidence-loader

use std::path::PathBuf;

use confidence_core::ValidationError;

use crate::DocumentFormat;

/// Result type for confidence-loader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to parse {format} document{}: {message}",
        .path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default()
    )]
    Parse {
        path: Option<PathBuf>,
        format: DocumentFormat,
        message: String,
    },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Document too large: {path} is {size} bytes (max {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    /// The document holds a value with no place in a configuration tree
    #[error("Invalid document node: {0}")]
    InvalidNode(#[from] ValidationError),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the file a parse error came from.
    pub(crate) fn in_file(self, file: impl Into<PathBuf>) -> Self {
        match self {
            Self::Parse { format, message, .. } => Self::Parse {
                path: Some(file.into()),
                format,
                message,
            },
            other => other,
        }
    }
}
