//! Command-line argument classification and interactive prompts.

use std::io::{self, BufRead, Write};

use crate::report::is_sort_option;

/// What the positional arguments asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub target: Option<String>,
    pub sort_by: Option<String>,
}

/// Splits positional arguments into the input file and the sort column.
///
/// An argument naming a report column (any case) or `none` is the sort
/// order; anything else is the file. When either appears more than once
/// the last one wins.
pub fn classify_args<S: AsRef<str>>(args: &[S]) -> Invocation {
    let mut invocation = Invocation::default();
    for arg in args {
        let arg = arg.as_ref();
        if is_sort_option(arg) {
            invocation.sort_by = Some(arg.to_string());
        } else {
            invocation.target = Some(arg.to_string());
        }
    }
    invocation
}

/// Writes `message` and reads one trimmed line of reply.
pub fn prompt_with<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> io::Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// `prompt_with` on the terminal.
pub fn prompt(message: &str) -> io::Result<String> {
    prompt_with(&mut io::stdin().lock(), &mut io::stdout(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args: [&str; 0] = [];
        assert_eq!(classify_args(&args), Invocation::default());
    }

    #[test]
    fn test_file_argument() {
        let inv = classify_args(&["test_file.txt"]);
        assert_eq!(inv.target.as_deref(), Some("test_file.txt"));
        assert_eq!(inv.sort_by, None);
    }

    #[test]
    fn test_file_and_sort_none() {
        let inv = classify_args(&["test_file.txt", "none"]);
        assert_eq!(inv.target.as_deref(), Some("test_file.txt"));
        assert_eq!(inv.sort_by.as_deref(), Some("none"));
    }

    #[test]
    fn test_sort_before_file_and_mixed_case() {
        let inv = classify_args(&["DATE", "cru.pre"]);
        assert_eq!(inv.target.as_deref(), Some("cru.pre"));
        assert_eq!(inv.sort_by.as_deref(), Some("DATE"));
    }

    #[test]
    fn test_invalid_sort_is_taken_as_target() {
        let inv = classify_args(&["test_file.txt", "invalid_sort"]);
        assert_eq!(inv.target.as_deref(), Some("invalid_sort"));
        assert_eq!(inv.sort_by, None);
    }

    #[test]
    fn test_prompt_reads_trimmed_reply() {
        let mut input = io::Cursor::new(b"test_file.txt\n".to_vec());
        let mut output = Vec::new();
        let reply = prompt_with(&mut input, &mut output, "Enter the file name: ").unwrap();
        assert_eq!(reply, "test_file.txt");
        assert_eq!(String::from_utf8(output).unwrap(), "Enter the file name: ");
    }

    #[test]
    fn test_prompt_on_closed_input_is_empty() {
        let mut input = io::Cursor::new(Vec::new());
        let mut output = Vec::new();
        assert_eq!(prompt_with(&mut input, &mut output, "Sort by: ").unwrap(), "");
    }
}
