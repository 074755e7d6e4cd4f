use std::ops::Range;

/// Represents an area within assembled markup.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct Region {
    /// The beginning of the range, inclusive.
    pub begin: usize,
    /// The ending of the range, exclusive.
    pub end: usize,
}

impl Region {
    /// Create a new [`Region`] from the given range.
    pub fn new(position: Range<usize>) -> Self {
        Self {
            begin: position.start,
            end: position.end,
        }
    }

    /// Create a [`Region`] covering the single character at `offset`.
    pub fn at(offset: usize, character: char) -> Self {
        Self {
            begin: offset,
            end: offset + character.len_utf8(),
        }
    }

    /// Return true if the [`Region`] spans no text.
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Access the literal value of a [`Region`].
    ///
    /// Returns an empty string when the `Region` is out of bounds or does not
    /// fall on character boundaries.
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        source.get(self.begin..self.end).unwrap_or_default()
    }
}

impl From<Range<usize>> for Region {
    fn from(value: Range<usize>) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_multibyte() {
        let region = Region::at(3, 'é');

        assert_eq!(region.end - region.begin, 2);
        assert!(!region.is_empty());
    }

    #[test]
    fn test_literal() {
        let source = "<p id=x>";

        assert_eq!(Region::new(1..2).literal(source), "p");
        assert_eq!(Region::new(3..7).literal(source), "id=x");
    }

    #[test]
    fn test_out_of_bounds_literal() {
        assert_eq!(Region::new(7..15).literal("<br>"), "");
    }
}
