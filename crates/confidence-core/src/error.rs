//! Error types for confidence-core

/// Result type for confidence-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in confidence-core operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The document was rejected by the validator; the previously loaded
    /// tree (if any) is left in place.
    #[error("Invalid document: {0}")]
    Validation(#[from] ValidationError),
}

/// A structural violation found while validating a document.
///
/// Carries the first violation only; validation stops as soon as one is found.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{reason} at {path}")]
pub struct ValidationError {
    /// What is wrong with the node
    pub reason: Reason,

    /// Slash-delimited location of the offending node (`/` for the root)
    pub path: String,
}

impl ValidationError {
    /// Create an error for the node at `path`.
    ///
    /// An empty path is rendered as the root (`/`).
    pub fn new(reason: Reason, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            reason,
            path: if path.is_empty() { "/".to_string() } else { path },
        }
    }
}

/// Why a node failed validation.
///
/// The `Display` form is the human-readable message reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Reason {
    #[error("Invalid node object type")]
    InvalidNodeType,

    #[error("Unknown $ directive {0}")]
    UnknownDirective(String),

    #[error("Invalid empty filter value")]
    EmptyFilter,

    #[error("Filter value must be a string")]
    FilterNotString,

    #[error("Invalid filter value {0}")]
    InvalidFilter(String),

    #[error("Range value must be an array")]
    RangeNotArray,

    #[error("Range must include at least one value")]
    EmptyRange,

    #[error("Invalid range entry type")]
    InvalidRangeEntry,

    #[error("Range entry missing limit")]
    RangeEntryMissingLimit,

    #[error("Range limit must be a number")]
    RangeLimitNotNumber,

    #[error("Range entries not sorted in ascending order - {limit} cannot come after {previous}")]
    RangeNotSorted { limit: String, previous: String },

    #[error("Range entry missing value")]
    RangeEntryMissingValue,

    #[error("Id value must be a non-empty string")]
    InvalidId,

    #[error("Value directive can only be used with meta or nothing")]
    ValueWithSiblings,

    #[error("Default value without a filter")]
    DefaultWithoutFilter,

    #[error("Filter without any values")]
    FilterWithoutValues,

    #[error("Filter with only a default")]
    FilterWithOnlyDefault,

    #[error("Range without a filter")]
    RangeWithoutFilter,

    #[error("Range with non-ranged values")]
    RangeWithBranches,
}
