use crate::{
    compile::placeholder::{Mark, Placeholder, POOL_SIZE},
    report::{error_fragment_mismatch, error_too_many_values, Error},
};
use std::fmt::{self, Display};

/// Assembled markup and the location of every placeholder token inside it.
///
/// The text is what errors point into and what the key is derived from. The
/// marks are the only tokens the parser reads, so a fragment that contains
/// `$1` as plain text is never mistaken for a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    text: String,
    marks: Vec<Mark>,
}

impl Markup {
    /// Create [`Markup`] from text without values.
    pub fn literal<T>(text: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            text: text.into(),
            marks: vec![],
        }
    }

    /// The assembled text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Token locations, sorted by offset.
    #[inline]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Interleave static fragments with placeholder tokens.
///
/// `fragments[i]` is followed by the token for value `i + 1`, and the final
/// fragment is appended unmodified. Values are never inspected here, only
/// counted.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`Arity`][`crate::ErrorKind::Arity`] when more
/// than [`POOL_SIZE`] values are supplied, or when the number of fragments is
/// not one more than the number of values.
///
/// # Examples
///
/// ```
/// use stencil::compile::assemble;
///
/// let markup = assemble(&["<div id=", ">", "</div>"], 2).unwrap();
/// assert_eq!(markup.as_str(), "<div id=$1>$2</div>");
/// assert_eq!(markup.marks()[1].offset, 11);
/// ```
pub fn assemble<S>(fragments: &[S], values: usize) -> Result<Markup, Error>
where
    S: AsRef<str>,
{
    if values > POOL_SIZE {
        return Err(error_too_many_values(values));
    }
    if fragments.len() != values + 1 {
        return Err(error_fragment_mismatch(fragments.len(), values));
    }

    let capacity = fragments.iter().map(|f| f.as_ref().len()).sum::<usize>() + values * 3;
    let mut text = String::with_capacity(capacity);
    let mut marks = Vec::with_capacity(values);

    for (index, fragment) in fragments.iter().enumerate() {
        text.push_str(fragment.as_ref());
        if let Some(placeholder) = Placeholder::from_index(index).filter(|_| index < values) {
            marks.push(Mark::new(text.len(), placeholder));
            text.push_str(placeholder.name());
        }
    }

    Ok(Markup { text, marks })
}
