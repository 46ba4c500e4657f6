//! Header metadata scanning.
//!
//! A grim file opens with free-text lines followed by bracketed tokens:
//!
//! ```text
//! [Long=-180.00, 180.00] [Lati= -90.00,  90.00] [Grid X,Y= 720, 360]
//! [Boxes=   67420] [Years=1991-2000] [Multi=    0.1000] [Missing=-999]
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Metadata;

/// `[key=value]`, split on the first `=`. Brackets without `=` are not tokens.
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]=]*)=([^\[\]]*)\]").expect("header token pattern"));

/// Extracts every metadata token on one line as trimmed `(key, value)` pairs.
pub fn tokens_in_line(line: &str) -> Vec<(&str, &str)> {
    TOKEN
        .captures_iter(line)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().trim();
            let value = caps.get(2)?.as_str().trim();
            Some((key, value))
        })
        .collect()
}

/// Scans leading lines for metadata and returns it with the header length.
///
/// Scanning stops at the first token-free line after metadata has started.
/// That line is not counted, so `header_length` is the index of the first
/// line the decoder should see. A file with no tokens at all is consumed
/// whole: `header_length == lines.len()`.
pub fn parse_header<S: AsRef<str>>(lines: &[S]) -> (Metadata, usize) {
    let mut metadata = Metadata::new();
    let mut started = false;
    let mut count = 0;

    for line in lines {
        let tokens = tokens_in_line(line.as_ref());
        if started && tokens.is_empty() {
            break;
        }
        if !tokens.is_empty() {
            for (key, value) in tokens {
                metadata.insert(key, value);
            }
            started = true;
        }
        count += 1;
    }

    (metadata, count)
}
