//! Grim file ingestion.
//!
//! Submodules, in pipeline order:
//! - `source`: reads the raw lines.
//! - `header`: `[key=value]` metadata and header length.
//! - `years` : start year from the `YYYY-YYYY` range.
//! - `grid`  : cell/month record decoder.
//!
//! `parse_lines` and `run_pipeline` chain them together.

pub mod grid;
pub mod header;
pub mod source;
pub mod years;

use std::path::Path;

use crate::config::DecodeSettings;
use crate::error::Result;
use crate::logging::{self, Stage};
use crate::model::{GridFormat, Metadata, PrecipitationRecord, ProblemRecord};
use crate::store::{InsertSummary, PrecipitationSink};

/// Everything decoded from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub metadata: Metadata,
    pub header_length: usize,
    pub start_year: i32,
    pub records: Vec<PrecipitationRecord>,
    pub problems: Vec<ProblemRecord>,
    /// Decoding passes run; more than one only with `all_passes`.
    pub passes: usize,
    /// Line index where decoding stopped on the cell cap, if it did.
    pub resume_at: Option<usize>,
}

/// A parsed file plus what the store did with its records.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub parsed: ParsedFile,
    pub stored: InsertSummary,
}

/// Header → start year → grid records, over lines already in memory.
///
/// Without `all_passes` a single capped pass is made. With it, passes
/// continue from each pass's `resume_at` until the input is exhausted.
pub fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    format: &GridFormat,
    settings: DecodeSettings,
) -> Result<ParsedFile> {
    let (metadata, header_length) = header::parse_header(lines);
    logging::debug(
        Stage::Header,
        None,
        &format!("{} metadata fields in {} header lines", metadata.len(), header_length),
    );

    let start_year = years::start_year_from(&metadata, format)?;

    let mut records = Vec::new();
    let mut problems = Vec::new();
    let mut offset = header_length;
    let mut passes = 0;

    let resume_at = loop {
        let pass = grid::decode_grid(lines, offset, start_year, format, settings.max_cells)?;
        passes += 1;
        records.extend(pass.records);
        problems.extend(pass.problems);

        match pass.resume_at {
            Some(next) if settings.all_passes && next > offset => offset = next,
            other => break other,
        }
    };

    if let Some(index) = resume_at {
        logging::info(
            Stage::Decode,
            None,
            &format!("stopped at cell cap, line {} onward not decoded", index + 1),
        );
    }

    Ok(ParsedFile {
        metadata,
        header_length,
        start_year,
        records,
        problems,
        passes,
        resume_at,
    })
}

/// Reads `path`, decodes it and hands the clean records to `sink` once.
/// Problem records are logged and returned, never stored.
pub fn run_pipeline(
    path: &Path,
    format: &GridFormat,
    settings: DecodeSettings,
    sink: &mut dyn PrecipitationSink,
) -> Result<IngestOutcome> {
    let lines = source::read_lines(path)?;
    logging::info(
        Stage::Source,
        None,
        &format!("read {} lines from {}", lines.len(), path.display()),
    );

    let parsed = parse_lines(&lines, format, settings)
        .inspect_err(|e| logging::error(Stage::Decode, None, &e.to_string()))?;
    logging::log_problem_records(&parsed.problems);

    let stored = sink.insert_records(&parsed.records)?;
    logging::log_store_summary(stored.total(), stored.inserted, stored.skipped);

    Ok(IngestOutcome { parsed, stored })
}
