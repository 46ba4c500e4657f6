//! Input source: the raw, ordered lines of a grim file.

use std::path::Path;

use crate::error::{Error, Result};

/// Reads the whole file into lines. Any failure to open or read it is
/// reported as `SourceNotFound`; it is never retried.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(String::from).collect())
}
