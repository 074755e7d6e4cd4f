/// Describes the internal state of a [`Parser`][`super::Parser`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum State {
    /// Outside of angle brackets, accumulating text.
    Text,
    /// Between `<` and `>`, accumulating tag content.
    Tag,
}

/// Text accumulated since a known offset in the source.
#[derive(Debug, Default)]
pub struct Buffer {
    /// Offset of the first character that was (or will be) pushed.
    pub begin: usize,
    /// Accumulated text.
    pub text: String,
}

impl Buffer {
    /// Create an empty [`Buffer`] starting at the given offset.
    #[inline]
    pub fn new(begin: usize) -> Self {
        Self {
            begin,
            text: String::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, c: char) {
        self.text.push(c)
    }

    /// Offset just past the accumulated text.
    #[inline]
    pub fn end(&self) -> usize {
        self.begin + self.text.len()
    }

    /// Return true if only whitespace was accumulated.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
