//! Document loading for confidence
//!
//! Reads authored configuration documents (JSON, YAML or TOML) into the
//! JSON tree that [`confidence_core::Store`] validates and resolves.

pub mod document;
pub mod error;
pub mod io;

pub use document::{DocumentFormat, DocumentLoader};
pub use error::{Error, Result};
