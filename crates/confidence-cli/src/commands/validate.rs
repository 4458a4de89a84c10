//! Validate command implementation

use std::io::Write;
use std::path::Path;

use confidence_core::Store;
use confidence_loader::DocumentLoader;

use super::Outcome;
use crate::error::Result;

/// Run the validate command
///
/// Prints `ok` for a well formed document. A malformed one is reported as an
/// error carrying the reason and the offending path.
pub fn run_validate(loader: &DocumentLoader, file: &Path, out: &mut impl Write) -> Result<Outcome> {
    let document = loader.load(file)?;
    Store::validate(&document)?;
    writeln!(out, "ok")?;
    Ok(Outcome::Done)
}
