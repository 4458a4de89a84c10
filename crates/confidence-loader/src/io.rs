//! File reads for document loading

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Read a text file, refusing files larger than `max_size` bytes.
pub fn read_text(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    if metadata.len() > max_size {
        return Err(Error::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: max_size,
        });
    }

    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
