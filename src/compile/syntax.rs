use std::collections::HashSet;

/// Tags that never own children, recognized by default.
pub const VOID_TAGS: [&str; 16] = [
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Settings that change how markup is read.
///
/// Create one with a [`Builder`], or use [`Syntax::default`] for the
/// standard set of void tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Syntax {
    void_tags: HashSet<String>,
}

impl Syntax {
    /// Return true if the tag is a void tag, which is never pushed as a parent.
    #[inline]
    pub fn is_void(&self, tag: &str) -> bool {
        self.void_tags.contains(tag)
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Builder::new().to_syntax()
    }
}

/// Provides methods to build a [`Syntax`].
///
/// # Example
///
/// ```
/// use stencil::compile::Builder;
///
/// let syntax = Builder::new()
///     .with_void_tag("icon")
///     .without_void_tag("command")
///     .to_syntax();
///
/// assert!(syntax.is_void("icon"));
/// assert!(syntax.is_void("br"));
/// assert!(!syntax.is_void("command"));
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    void_tags: HashSet<String>,
}

impl Builder {
    /// Create a new [`Builder`] holding the default [`VOID_TAGS`].
    #[inline]
    pub fn new() -> Self {
        Self {
            void_tags: VOID_TAGS.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    /// Create a new [`Builder`] with no void tags at all.
    ///
    /// Elements may still close themselves with a trailing slash, as in `<br/>`.
    #[inline]
    pub fn empty() -> Self {
        Self {
            void_tags: HashSet::new(),
        }
    }

    /// Add a void tag.
    pub fn set_void_tag<T>(&mut self, tag: T)
    where
        T: Into<String>,
    {
        self.void_tags.insert(tag.into());
    }

    /// Add a void tag.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_void_tag<T>(mut self, tag: T) -> Self
    where
        T: Into<String>,
    {
        self.set_void_tag(tag);

        self
    }

    /// Remove a void tag, so it may own children.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn without_void_tag(mut self, tag: &str) -> Self {
        self.void_tags.remove(tag);

        self
    }

    /// Return a [`Syntax`] from the settings in this [`Builder`].
    pub fn to_syntax(self) -> Syntax {
        Syntax {
            void_tags: self.void_tags,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_void_tags() {
        let syntax = Syntax::default();

        for tag in VOID_TAGS {
            assert!(syntax.is_void(tag));
        }
        assert!(!syntax.is_void("div"));
    }

    #[test]
    fn test_empty_builder() {
        let syntax = Builder::empty().with_void_tag("x-spacer").to_syntax();

        assert!(syntax.is_void("x-spacer"));
        assert!(!syntax.is_void("br"));
    }
}
