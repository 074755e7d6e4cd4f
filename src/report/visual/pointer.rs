use std::{
    cmp::max,
    fmt::{Formatter, Result},
};

use super::{
    super::{RESET, YELLOW},
    {get_line_and_column, get_width, Visual, BLANK, EQUAL, HIGHLIGHT, PIPE},
};
use crate::region::Region;

/// A type of `Visual` that points to a specific location within markup.
#[derive(Debug, PartialEq)]
pub struct Pointer {
    /// The line that the Pointer is pointing to, zero indexed.
    line: usize,
    /// The column that the Pointer is pointing to, zero indexed.
    column: usize,
    /// The length of the object being highlighted.
    length: usize,
    /// The actual line of text that is being pointed to.
    text: String,
}

impl Pointer {
    /// Create a new Pointer over the given source text and Region.
    pub fn new(source: &str, region: Region) -> Self {
        let lines: Vec<_> = source.split_terminator('\n').collect();
        let (line, column) = get_line_and_column(&lines, region.begin);
        let length = max(1, get_width(region.literal(source).lines().next().unwrap_or("")));
        let text = lines
            .get(line)
            .or_else(|| lines.last())
            .map(|line| line.trim_end_matches('\r').to_string())
            .unwrap_or_default();

        Self {
            line,
            column,
            length,
            text,
        }
    }

    /// Return the zero indexed (line, column) of the Pointer.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

impl Visual for Pointer {
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result {
        let num = (self.line + 1).to_string();
        let col = self.column + 1;
        let pad = get_width(&num);
        let align = self.column + self.length;

        let name = template.unwrap_or("?");
        let text = &self.text;
        let underline = HIGHLIGHT.repeat(self.length);

        write!(
            formatter,
            "\n {BLANK:pad$}--> {name}:{num}:{col}\
             \n {BLANK:pad$} {PIPE}\
             \n {num:>} {PIPE} {text}\
             \n {BLANK:pad$} {PIPE} {YELLOW}{underline:>align$}{RESET}\
             \n {BLANK:pad$} {PIPE}\n",
        )?;

        if let Some(help) = help {
            writeln!(formatter, "{BLANK:pad$} {EQUAL} help: {help}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_second_line() {
        let source = "<ul>\n  <li>x</lo>\n</ul>";
        let pointer = Pointer::new(source, (12..17).into());

        assert_eq!(pointer.position(), (1, 7));
        assert_eq!(pointer.length, 5);
        assert_eq!(pointer.text, "  <li>x</lo>");
    }

    #[test]
    fn test_pointer_at_end_of_source() {
        let source = "<div>";
        let pointer = Pointer::new(source, (5..5).into());

        assert_eq!(pointer.length, 1);
        assert_eq!(pointer.text, "<div>");
    }
}
