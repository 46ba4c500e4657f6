//! Error types for the precipitation ingest.
//!
//! Malformed data lines are not errors: they come back from the decoder as
//! `ProblemRecord`s. Everything here aborts the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be opened or read.
    #[error("File '{}' not found", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A grid reference or value token that must be numeric is not.
    /// `line` is 1-based and counts from the top of the file.
    #[error("Corrupt input at line {line}: {reason}")]
    CorruptInput { line: usize, reason: String },

    /// The header carries no usable `YYYY-YYYY` range.
    #[error("No year range in header: {0}")]
    YearRangeAbsent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    /// True for the structural failures of the file itself, as opposed to
    /// environment problems (missing file, database, config).
    pub fn is_corrupt_input(&self) -> bool {
        matches!(self, Error::CorruptInput { .. } | Error::YearRangeAbsent(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_input_message_names_line() {
        let err = Error::CorruptInput { line: 7, reason: "grid reference 'Grid-ref' has no row".into() };
        assert_eq!(err.to_string(), "Corrupt input at line 7: grid reference 'Grid-ref' has no row");
        assert!(err.is_corrupt_input());
    }

    #[test]
    fn test_source_not_found_is_not_corrupt_input() {
        let err = Error::SourceNotFound {
            path: PathBuf::from("missing.pre"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "File 'missing.pre' not found");
        assert!(!err.is_corrupt_input());
    }
}
