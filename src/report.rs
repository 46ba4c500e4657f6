//! Tabular report of decoded records.
//!
//! Columns are `Xref | Yref | Date | Value`, left aligned, with dates
//! written `1/<month>/<year>`.

use std::fmt;
use std::str::FromStr;

use prettytable::{format, Cell, Row, Table};

use crate::model::{PrecipitationRecord, REPORT_COLUMNS};

/// Column to sort the report by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Xref,
    Yref,
    /// Chronological: year, then month.
    Date,
    Value,
    #[default]
    Unsorted,
}

/// A sort option that names no column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(pub String);

impl fmt::Display for UnknownSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid sort option. '{}'", self.0)
    }
}

impl std::error::Error for UnknownSortKey {}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    /// Case-insensitive column name, or `none`/empty for file order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xref" => Ok(SortKey::Xref),
            "yref" => Ok(SortKey::Yref),
            "date" => Ok(SortKey::Date),
            "value" => Ok(SortKey::Value),
            "none" | "" => Ok(SortKey::Unsorted),
            _ => Err(UnknownSortKey(s.trim().to_lowercase())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Xref => write!(f, "Xref"),
            SortKey::Yref => write!(f, "Yref"),
            SortKey::Date => write!(f, "Date"),
            SortKey::Value => write!(f, "Value"),
            SortKey::Unsorted => write!(f, "none"),
        }
    }
}

/// True when `arg` names a report column or `none`, ignoring case.
pub fn is_sort_option(arg: &str) -> bool {
    let lower = arg.to_lowercase();
    lower == "none" || REPORT_COLUMNS.iter().any(|c| c.to_lowercase() == lower)
}

/// Returns the records in report order. The sort is stable, so ties keep
/// file order.
pub fn sorted_records(records: &[PrecipitationRecord], key: SortKey) -> Vec<PrecipitationRecord> {
    let mut rows = records.to_vec();
    match key {
        SortKey::Xref => rows.sort_by_key(|r| r.x),
        SortKey::Yref => rows.sort_by_key(|r| r.y),
        SortKey::Date => rows.sort_by_key(|r| (r.year, r.month)),
        SortKey::Value => rows.sort_by_key(|r| r.value),
        SortKey::Unsorted => {}
    }
    rows
}

pub fn build_table(records: &[PrecipitationRecord], key: SortKey) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_DEFAULT);
    table.set_titles(Row::new(REPORT_COLUMNS.iter().map(|c| Cell::new(c)).collect()));

    for record in sorted_records(records, key) {
        table.add_row(Row::new(vec![
            Cell::new(&record.x.to_string()),
            Cell::new(&record.y.to_string()),
            Cell::new(&record.date_label()),
            Cell::new(&record.value.to_string()),
        ]));
    }

    table
}
