mod pointer;

pub use pointer::Pointer;

use std::fmt::{Debug, Formatter, Result};

const BLANK: &str = "";
const PIPE: &str = "|";
const EQUAL: &str = "=";
const HIGHLIGHT: &str = "^";

/// Describes a type that can be associated with an Error and used
/// to print a visualization.
pub trait Visual: Debug {
    /// Display the visualization by writing to the given Formatter.
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result;
}

/// Get the line and column for a byte offset into the given lines.
fn get_line_and_column(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;

    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            let column = line.get(..offset - n).map(get_width).unwrap_or(offset - n);
            return (i, column);
        }
        n += len;
    }

    let last = lines.last().map(|line| get_width(line)).unwrap_or(0);

    (lines.len().saturating_sub(1), last)
}

/// Wrapper for UnicodeWidthStr::width.
fn get_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column() {
        let lines = ["<ul>", "  <li>", "</ul>"];

        assert_eq!(get_line_and_column(&lines, 0), (0, 0));
        assert_eq!(get_line_and_column(&lines, 7), (1, 2));
        assert_eq!(get_line_and_column(&lines, 12), (2, 0));
    }

    #[test]
    fn test_past_end_points_at_last_line() {
        let lines = ["<div>"];

        assert_eq!(get_line_and_column(&lines, 40), (0, 5));
    }
}
