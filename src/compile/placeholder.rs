use std::fmt::{self, Display};

/// Number of positional placeholders available to a single template.
pub const POOL_SIZE: usize = 14;

/// Character that begins every placeholder token.
pub const SIGIL: char = '$';

/// Text form of every placeholder, built once and shared by every compilation.
const NAMES: [&str; POOL_SIZE] = [
    "$1", "$2", "$3", "$4", "$5", "$6", "$7", "$8", "$9", "$10", "$11", "$12", "$13", "$14",
];

/// A positional stand-in for a dynamic value, `$1` through `$14`.
///
/// A `Placeholder` is a syntactic marker only. The value it stands for lives
/// in the [`Props`][`crate::Props`] of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placeholder(usize);

impl Placeholder {
    /// Create the placeholder with the given 1-based number.
    ///
    /// Returns `None` when the number is outside of the pool.
    pub fn new(number: usize) -> Option<Self> {
        (1..=POOL_SIZE).contains(&number).then_some(Self(number))
    }

    /// Create the placeholder standing for the value at the given 0-based index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::new(index + 1)
    }

    /// The 1-based number of this placeholder.
    pub fn number(self) -> usize {
        self.0
    }

    /// The 0-based position of the value this placeholder stands for.
    pub fn index(self) -> usize {
        self.0 - 1
    }

    /// The token text, such as `$3`.
    pub fn name(self) -> &'static str {
        NAMES[self.index()]
    }
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Piece of markup text, either literal or a placeholder token.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Segment<'text> {
    Literal(&'text str),
    Token(Placeholder),
}

/// A placeholder token written at a known byte offset.
///
/// Markup is only ever scanned through its marks. Text that happens to look
/// like a token, such as a literal `$1` in a fragment, stays literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// Byte offset of the sigil.
    pub offset: usize,
    pub placeholder: Placeholder,
}

impl Mark {
    #[inline]
    pub fn new(offset: usize, placeholder: Placeholder) -> Self {
        Self {
            offset,
            placeholder,
        }
    }

    /// Byte offset just past the token.
    #[inline]
    pub fn end(self) -> usize {
        self.offset + self.placeholder.name().len()
    }
}

/// Return the placeholder whose token begins at the given offset.
///
/// `marks` must be sorted by offset.
pub fn mark_at(marks: &[Mark], offset: usize) -> Option<Placeholder> {
    marks
        .binary_search_by_key(&offset, |mark| mark.offset)
        .ok()
        .map(|index| marks[index].placeholder)
}

/// Marks lying wholly within `begin..end`, with offsets made relative to `begin`.
pub fn marks_within(marks: &[Mark], begin: usize, end: usize) -> Vec<Mark> {
    marks
        .iter()
        .filter(|mark| mark.offset >= begin && mark.end() <= end)
        .map(|mark| Mark::new(mark.offset - begin, mark.placeholder))
        .collect()
}

/// Split text into literal runs and placeholder tokens.
///
/// Only the tokens named by `marks` are split out, offsets relative to `text`.
/// Digits that follow a token belong to the literal after it, so a `$1`
/// followed by `0` is never read as `$10`.
pub fn segments<'text>(text: &'text str, marks: &[Mark]) -> Vec<Segment<'text>> {
    let mut output = vec![];
    let mut literal_begin = 0;

    for mark in marks {
        if mark.offset < literal_begin || text.get(mark.offset..mark.end()).is_none() {
            continue;
        }
        if let Some(literal) = text.get(literal_begin..mark.offset).filter(|l| !l.is_empty()) {
            output.push(Segment::Literal(literal));
        }
        output.push(Segment::Token(mark.placeholder));
        literal_begin = mark.end();
    }

    if let Some(literal) = text.get(literal_begin..).filter(|l| !l.is_empty()) {
        output.push(Segment::Literal(literal));
    }

    output
}
