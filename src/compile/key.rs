use crate::{compile::assemble::Markup, props::Shape};
use std::fmt::{self, Display};

/// Hashed name of a compiled producer.
///
/// The key covers everything the producer depends on: the assembled markup,
/// the token offsets and the shape of every value. Distinct templates may
/// still hash alike, so the cache also compares their full
/// [`template_identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Key of the empty input, kept distinct from every hash.
    Empty,
    /// Signed 32-bit string hash.
    Hash(i32),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Empty => Ok(()),
            CacheKey::Hash(hash) => write!(f, "{hash}"),
        }
    }
}

/// Hash the given text into a [`CacheKey`].
///
/// Accumulates `hash * 31 + unit` over the UTF-16 code units of the text with
/// 32-bit wrapping arithmetic. Empty text yields [`CacheKey::Empty`].
///
/// # Examples
///
/// ```
/// use stencil::compile::{derive_key, CacheKey};
///
/// assert_eq!(derive_key(""), CacheKey::Empty);
/// assert_eq!(derive_key("a"), CacheKey::Hash(97));
/// ```
pub fn derive_key(text: &str) -> CacheKey {
    if text.is_empty() {
        return CacheKey::Empty;
    }

    let hash = text
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));

    CacheKey::Hash(hash)
}

/// Text that identifies an assembled template and the shape of its values.
///
/// The markup itself when there are no values. Otherwise the markup, a NUL,
/// then for each value its signature character (`[` list, `=` scalar)
/// followed by the byte offset of its token. Two templates share a producer
/// only when their identities are equal.
pub fn template_identity<I>(markup: &Markup, shapes: I) -> String
where
    I: IntoIterator<Item = Shape>,
{
    let mut pairs = markup.marks().iter().zip(shapes).peekable();
    if pairs.peek().is_none() {
        return markup.as_str().to_string();
    }

    let mut text = String::with_capacity(markup.as_str().len() + 32);
    text.push_str(markup.as_str());
    text.push('\0');
    for (mark, shape) in pairs {
        text.push(shape.signature());
        text.push_str(&mark.offset.to_string());
    }

    text
}

/// Derive the [`CacheKey`] of an assembled template.
///
/// The hash of its [`template_identity`].
pub fn template_key<I>(markup: &Markup, shapes: I) -> CacheKey
where
    I: IntoIterator<Item = Shape>,
{
    derive_key(&template_identity(markup, shapes))
}
