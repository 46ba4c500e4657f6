//! Grid record decoder.
//!
//! After the header, a grim file alternates grid-reference lines with one
//! line of twelve monthly values per year:
//!
//! ```text
//! Grid-ref=   1, 148
//!  3020 2820 3040 2880 1740 1360  980  990 1410 1770 2580 2630
//!  3100 2700 ...
//! Grid-ref=   2, 148
//! ```
//!
//! # Cell cap
//! A single call decodes at most `max_cells` cells. The marker line that
//! exceeds the cap is consumed (it ends the pass) but none of its data is
//! decoded; its index is returned as `resume_at` so the next pass can start
//! there. `None` lifts the cap.

use std::num::NonZeroUsize;

use crate::error::{Error, Result};
use crate::logging::{self, Stage};
use crate::model::{GridFormat, Observation, PrecipitationRecord, ProblemRecord, MONTHS_PER_LINE};

/// Cells decoded per pass unless the caller says otherwise.
pub const DEFAULT_MAX_CELLS: usize = 5;

pub fn default_max_cells() -> Option<NonZeroUsize> {
    NonZeroUsize::new(DEFAULT_MAX_CELLS)
}

/// Output of one decoding pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedGrid {
    pub records: Vec<PrecipitationRecord>,
    pub problems: Vec<ProblemRecord>,
    /// Absolute line index of the marker that tripped the cell cap, `None`
    /// when the input ran out first.
    pub resume_at: Option<usize>,
}

/// Current cell and year while walking the data section.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    x: i32,
    y: i32,
    year: i32,
}

impl Cursor {
    fn cell_label(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

/// Decodes `lines[header_length..]` into precipitation records.
///
/// `lines` is the whole file so reported line numbers match the source.
/// Every data line advances the year, including malformed ones; a
/// grid-reference line resets it to `start_year`.
///
/// # Errors
/// `Error::CorruptInput` when a grid reference lacks its column/row or a
/// value token is not an integer. Nothing decoded by the pass is returned
/// in that case.
pub fn decode_grid<S: AsRef<str>>(
    lines: &[S],
    header_length: usize,
    start_year: i32,
    format: &GridFormat,
    max_cells: Option<NonZeroUsize>,
) -> Result<DecodedGrid> {
    let mut out = DecodedGrid::default();
    let mut cursor = Cursor { x: 0, y: 0, year: start_year };
    let mut cells_seen = 0usize;

    let data = lines.get(header_length..).unwrap_or(&[]);

    for (offset, line) in data.iter().enumerate() {
        let index = header_length + offset;
        let line = line.as_ref();

        if line.contains(format.grid_marker.as_str()) {
            let (x, y) = parse_grid_ref(line, index + 1)?;
            cursor = Cursor { x, y, year: start_year };
            cells_seen += 1;

            if max_cells.is_some_and(|cap| cells_seen > cap.get()) {
                logging::debug(
                    Stage::Decode,
                    Some(&cursor.cell_label()),
                    &format!("cell cap reached at line {}", index + 1),
                );
                out.resume_at = Some(index);
                break;
            }
            continue;
        }

        for observation in observe_line(line, &cursor, index + 1)? {
            match observation {
                Observation::Clean(record) => out.records.push(record),
                Observation::Malformed(problem) => {
                    logging::warn(
                        Stage::Decode,
                        Some(&cursor.cell_label()),
                        &format!(
                            "line {}: expected {} values, found {}",
                            index + 1,
                            MONTHS_PER_LINE,
                            problem.tokens.len()
                        ),
                    );
                    out.problems.push(problem);
                }
            }
        }
        cursor.year += 1;
    }

    Ok(out)
}

/// Reads column and row from a grid-reference line such as
/// `Grid-ref=   1, 148`. The column may carry a trailing comma.
fn parse_grid_ref(line: &str, line_no: usize) -> Result<(i32, i32)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(Error::CorruptInput {
            line: line_no,
            reason: format!("grid reference '{}' is missing its column or row", line.trim()),
        });
    }

    let x = parse_int(tokens[1].trim_end_matches(','), line_no, "grid column")?;
    let y = parse_int(tokens[2], line_no, "grid row")?;
    Ok((x, y))
}

/// Turns one data line into observations: twelve clean records, or a single
/// malformed one carrying the raw tokens.
fn observe_line(line: &str, cursor: &Cursor, line_no: usize) -> Result<Vec<Observation>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() != MONTHS_PER_LINE {
        return Ok(vec![Observation::Malformed(ProblemRecord {
            x: cursor.x,
            y: cursor.y,
            month: 1,
            year: cursor.year,
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        })]);
    }

    tokens
        .iter()
        .zip(1..)
        .map(|(token, month)| -> Result<Observation> {
            Ok(Observation::Clean(PrecipitationRecord {
                x: cursor.x,
                y: cursor.y,
                month,
                year: cursor.year,
                value: parse_int(token, line_no, "monthly value")?,
            }))
        })
        .collect()
}

fn parse_int(token: &str, line_no: usize, what: &str) -> Result<i32> {
    token.parse().map_err(|_| Error::CorruptInput {
        line: line_no,
        reason: format!("{} '{}' is not an integer", what, token),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
