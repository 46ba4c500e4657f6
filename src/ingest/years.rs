//! Start-year extraction from the header's `Years` field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{GridFormat, Metadata};

static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})-([0-9]{4})").expect("year range pattern"));

/// Returns the first year of the first `YYYY-YYYY` range found anywhere in
/// `text`, or `None` when there is no such range.
pub fn start_year(text: &str) -> Option<i32> {
    YEAR_RANGE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Looks up the format's years key in the header and extracts the start
/// year. A missing key or a value without a range is fatal: there is no
/// year to seed the decoder with.
pub fn start_year_from(metadata: &Metadata, format: &GridFormat) -> Result<i32> {
    let field = metadata.get(&format.years_key).ok_or_else(|| {
        Error::YearRangeAbsent(format!("header has no '{}' field", format.years_key))
    })?;

    start_year(field).ok_or_else(|| {
        Error::YearRangeAbsent(format!(
            "'{}' field '{}' is not a YYYY-YYYY range",
            format.years_key, field
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_year_valid_range() {
        assert_eq!(start_year("Years=1991-2000"), Some(1991));
    }

    #[test]
    fn test_start_year_no_range() {
        assert_eq!(start_year("Years="), None);
    }

    #[test]
    fn test_start_year_wrong_separator() {
        assert_eq!(start_year("Years=1991/2000"), None);
    }

    #[test]
    fn test_start_year_partial_range() {
        assert_eq!(start_year("Years=1991-"), None);
    }

    #[test]
    fn test_start_year_non_numeric() {
        assert_eq!(start_year("Years=abcd-efgh"), None);
    }

    #[test]
    fn test_start_year_surrounded_by_text() {
        assert_eq!(start_year("Some text Years=1985-1995 more text"), Some(1985));
    }

    #[test]
    fn test_start_year_from_metadata() {
        let mut meta = Metadata::new();
        meta.insert("Years", "1991-2000");
        assert_eq!(start_year_from(&meta, &GridFormat::default()).unwrap(), 1991);
    }

    #[test]
    fn test_start_year_from_missing_key_is_year_range_absent() {
        let meta = Metadata::new();
        let err = start_year_from(&meta, &GridFormat::default()).unwrap_err();
        assert!(matches!(err, Error::YearRangeAbsent(_)));
    }

    #[test]
    fn test_start_year_from_unparseable_value_is_year_range_absent() {
        let mut meta = Metadata::new();
        meta.insert("Years", "1991");
        let err = start_year_from(&meta, &GridFormat::default()).unwrap_err();
        assert!(matches!(err, Error::YearRangeAbsent(_)));
    }

    #[test]
    fn test_start_year_from_honours_custom_key() {
        let mut meta = Metadata::new();
        meta.insert("Period", "1961-1990");
        let format = GridFormat { years_key: "Period".to_string(), ..GridFormat::default() };
        assert_eq!(start_year_from(&meta, &format).unwrap(), 1961);
    }
}
