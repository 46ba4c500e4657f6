/// Core data types for the gridded precipitation ingest.
///
/// This module defines the shared domain model imported by all other modules:
/// the header metadata map, the decoded observations and the format
/// constants that describe a grim-style precipitation file. It contains no
/// I/O.

use serde::ser::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Format constants
// ---------------------------------------------------------------------------

/// Substring that marks a new grid cell, e.g. `Grid-ref=   1, 148`.
pub const DEFAULT_GRID_MARKER: &str = "Grid-ref";

/// Metadata key holding the `YYYY-YYYY` year range.
pub const DEFAULT_YEARS_KEY: &str = "Years";

/// One data line carries one value per calendar month.
pub const MONTHS_PER_LINE: usize = 12;

/// Column titles of the rendered report, in display order.
pub const REPORT_COLUMNS: [&str; 4] = ["Xref", "Yref", "Date", "Value"];

/// The format knobs the parsers need, passed in rather than read from
/// module globals so a variant layout only needs a different value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFormat {
    pub grid_marker: String,
    pub years_key: String,
}

impl Default for GridFormat {
    fn default() -> Self {
        Self {
            grid_marker: DEFAULT_GRID_MARKER.to_string(),
            years_key: DEFAULT_YEARS_KEY.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Header metadata
// ---------------------------------------------------------------------------

/// Header `[key=value]` pairs in the order they first appeared.
///
/// Re-inserting a key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "[{}={}]", key, value)?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// One month of precipitation for one grid cell.
///
/// `value` is kept in the dataset's native units (the header's `Multi`
/// factor is not applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PrecipitationRecord {
    pub x: i32,
    pub y: i32,
    pub month: i32,
    pub year: i32,
    pub value: i32,
}

/// Deduplication key of a record: one value per cell per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NaturalKey {
    pub x: i32,
    pub y: i32,
    pub year: i32,
    pub month: i32,
}

impl PrecipitationRecord {
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            x: self.x,
            y: self.y,
            year: self.year,
            month: self.month,
        }
    }

    /// Report date label, `1/<month>/<year>`.
    pub fn date_label(&self) -> String {
        format!("1/{}/{}", self.month, self.year)
    }
}

/// A data line that did not carry exactly one token per month.
///
/// The raw tokens are kept as-is so the line can be found and inspected in
/// the source file. `month` is always 1: decoding of the line stops before
/// any month is assigned.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProblemRecord {
    pub x: i32,
    pub y: i32,
    pub month: i32,
    pub year: i32,
    pub tokens: Vec<String>,
}

impl fmt::Display for ProblemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X: {}, Y: {}, Year: {}, Data: {:?}",
            self.x, self.y, self.year, self.tokens
        )
    }
}

/// What the decoder makes of a single data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Clean(PrecipitationRecord),
    Malformed(ProblemRecord),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_keeps_first_position_on_overwrite() {
        let mut meta = Metadata::new();
        meta.insert("Long", "-180.00, 180.00");
        meta.insert("Years", "1991-2000");
        meta.insert("Long", "0.00, 10.00");

        let keys: Vec<_> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Long", "Years"]);
        assert_eq!(meta.get("Long"), Some("0.00, 10.00"));
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_metadata_display_mirrors_header_tokens() {
        let mut meta = Metadata::new();
        meta.insert("Boxes", "67420");
        meta.insert("Years", "1991-2000");
        assert_eq!(meta.to_string(), "[Boxes=67420] [Years=1991-2000]");
    }

    #[test]
    fn test_metadata_serializes_as_json_object() {
        let mut meta = Metadata::new();
        meta.insert("Missing", "-999");
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"Missing":"-999"}"#);
    }

    #[test]
    fn test_date_label_format() {
        let record = PrecipitationRecord { x: 1, y: 148, month: 3, year: 1991, value: 2820 };
        assert_eq!(record.date_label(), "1/3/1991");
    }

    #[test]
    fn test_problem_record_display_lists_raw_tokens() {
        let problem = ProblemRecord {
            x: 1,
            y: 2,
            month: 1,
            year: 2000,
            tokens: vec!["10".to_string(), "20".to_string()],
        };
        assert_eq!(problem.to_string(), r#"X: 1, Y: 2, Year: 2000, Data: ["10", "20"]"#);
    }
}
