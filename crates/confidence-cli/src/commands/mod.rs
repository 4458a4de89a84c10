//! Command implementations for confidence-cli

pub mod lookup;
pub mod validate;

pub use lookup::{run_get, run_meta};
pub use validate::run_validate;

/// How a command finished when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command produced its output
    Done,
    /// The requested key resolved to nothing
    Missing,
}
