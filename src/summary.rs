//! Machine-readable run summary, written as JSON on request.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::ingest::IngestOutcome;
use crate::model::{Metadata, ProblemRecord};
use crate::store::InsertSummary;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub metadata: Metadata,
    pub header_length: usize,
    pub start_year: i32,
    pub record_count: usize,
    pub passes: usize,
    /// 1-based line where the cell cap stopped decoding
    pub stopped_at_line: Option<usize>,
    pub stored: InsertSummary,
    pub problems: Vec<ProblemRecord>,
}

impl RunSummary {
    pub fn new(source: &Path, outcome: &IngestOutcome, generated_at: DateTime<Utc>) -> Self {
        let parsed = &outcome.parsed;
        Self {
            generated_at,
            source: source.display().to_string(),
            metadata: parsed.metadata.clone(),
            header_length: parsed.header_length,
            start_year: parsed.start_year,
            record_count: parsed.records.len(),
            passes: parsed.passes,
            stopped_at_line: parsed.resume_at.map(|i| i + 1),
            stored: outcome.stored,
            problems: parsed.problems.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
