//! Markup parser.
//!
//! Reads assembled markup one character at a time and builds a tree of
//! [`Node`] instances. Placeholders found in child text are resolved against
//! the shape of the current [`Props`]: a list is spliced in as the element's
//! child content, anything else is interpolated into the text.
pub mod tag;
pub mod tree;

mod state;

use crate::{
    compile::{
        assemble::Markup,
        parse::{
            state::{Buffer, State},
            tag::{is_tag_name, parse_tag, TagData},
            tree::{ChildList, ChildNode, Node, Text},
        },
        placeholder::{marks_within, Mark},
        Syntax,
    },
    props::{Props, Shape},
    region::Region,
    report::{
        error_unterminated_tag, expected_closing, Error, INVALID_NAME, MISMATCHED_TAG,
        MISSING_ROOT, MULTIPLE_ROOTS, UNCLOSED_TAG, UNEXPECTED_TEXT,
    },
};

pub struct Parser<'source> {
    /// Assembled markup.
    source: &'source str,
    /// Placeholder tokens of the markup.
    marks: &'source [Mark],
    /// Values of the invocation being compiled, consulted for their shape only.
    props: &'source Props,
    /// Void tags and other settings.
    syntax: &'source Syntax,
    /// Open elements, innermost last.
    ///
    /// Exists only while parsing, the finished tree has no parent links.
    stack: Vec<Node>,
    /// The completed root element.
    root: Option<Node>,
}

impl<'source> Parser<'source> {
    /// Create a new Parser over the given markup.
    #[inline]
    pub fn new(markup: &'source Markup, props: &'source Props, syntax: &'source Syntax) -> Self {
        Self {
            source: markup.as_str(),
            marks: markup.marks(),
            props,
            syntax,
            stack: vec![],
            root: None,
        }
    }

    /// Parse the markup.
    ///
    /// Returns the root [`Node`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`Structure`][`crate::ErrorKind::Structure`] when
    /// the markup does not describe exactly one well formed root element.
    pub fn parse(mut self) -> Result<Node, Error> {
        let mut state = State::Text;
        let mut text = Buffer::new(0);
        let mut tag = Buffer::new(0);

        for (index, char) in self.source.char_indices() {
            match (state, char) {
                (State::Text, '<') => {
                    state = State::Tag;
                    tag = Buffer::new(index);
                }
                (State::Tag, '<') => {
                    return Err(error_unterminated_tag(
                        self.source,
                        Region::new(tag.begin..index),
                    ))
                }
                (State::Tag, '>') => {
                    let region = Region::new(tag.begin..index + 1);
                    match tag.text.strip_prefix('/') {
                        Some(name) => self.close(name, region, &text)?,
                        None => self.open(&tag.text, region, &text)?,
                    }

                    state = State::Text;
                    text = Buffer::new(index + 1);
                }
                (State::Tag, c) => tag.push(c),
                (State::Text, c) => text.push(c),
            }
        }

        if state == State::Tag {
            return Err(error_unterminated_tag(
                self.source,
                Region::new(tag.begin..self.source.len()),
            ));
        }
        if let Some(open) = self.stack.last() {
            return Err(Error::structure(UNCLOSED_TAG)
                .with_pointer(self.source, open.region)
                .with_help(expected_closing(Some(&open.tag))));
        }
        if !text.is_blank() {
            return Err(self.error_stray_text(&text));
        }

        self.root.ok_or_else(|| {
            Error::structure(MISSING_ROOT)
                .with_pointer(self.source, Region::new(0..self.source.len()))
                .with_help("a template must contain exactly one root element")
        })
    }

    /// Handle an opening tag.
    ///
    /// Text pending before the tag may only be a list splice, since an element
    /// holds either text or nodes.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the tag is malformed, when it would become a
    /// second root, or when it follows stray text.
    fn open(&mut self, content: &str, region: Region, pending: &Buffer) -> Result<(), Error> {
        self.flush(pending, false)?;

        let leading = content.len() - content.trim_start().len();
        let offset = region.begin + 1 + leading;
        let (content, self_closing) = split_self_closing(content.trim());

        let data = if content.contains(char::is_whitespace) {
            parse_tag(self.source, content, offset, self.marks)?
        } else if is_tag_name(content) {
            TagData::bare(content)
        } else {
            return Err(Error::structure(INVALID_NAME)
                .with_pointer(self.source, region)
                .with_help("expected a tag name such as `div`"));
        };

        let node = Node {
            tag: data.tag,
            attrs: data.attrs,
            key: data.key,
            children: ChildList::default(),
            region,
        };

        if self_closing || self.syntax.is_void(&node.tag) {
            return self.attach(node);
        }
        if self.stack.is_empty() && self.root.is_some() {
            return Err(self.error_multiple_roots(region));
        }
        self.stack.push(node);

        Ok(())
    }

    /// Handle a closing tag, given the name after the `/`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the name does not match the open element, or
    /// when the pending text cannot become the element's content.
    fn close(&mut self, name: &str, region: Region, pending: &Buffer) -> Result<(), Error> {
        let name = name.trim();
        let expected = self.stack.last().map(|node| node.tag.as_str());

        if expected != Some(name) {
            // Void elements never own children, so their closing tag is skipped.
            if self.syntax.is_void(name) {
                return self.flush(pending, false);
            }
            return Err(Error::structure(MISMATCHED_TAG)
                .with_pointer(self.source, region)
                .with_help(expected_closing(expected)));
        }

        self.flush(pending, true)?;
        match self.stack.pop() {
            Some(node) => self.attach(node),
            None => Ok(()),
        }
    }

    /// Give pending text to the innermost open element.
    ///
    /// Text reading a list-shaped placeholder becomes a splice of that
    /// placeholder and its literal text is dropped. Other text becomes the
    /// element's whole content, which is only possible while `closing` and the
    /// element has no nodes yet.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when non-blank text cannot be placed.
    fn flush(&mut self, pending: &Buffer, closing: bool) -> Result<(), Error> {
        if pending.is_blank() {
            return Ok(());
        }

        let marks = marks_within(self.marks, pending.begin, pending.end());
        let text = Text::normalized(&pending.text, &marks);
        let splice = text
            .reads()
            .find(|placeholder| self.props.shape(*placeholder) == Some(Shape::List));

        let placeable = match self.stack.last() {
            Some(parent) => splice.is_some() || (closing && parent.children.is_empty()),
            None => false,
        };
        if !placeable {
            return Err(self.error_stray_text(pending));
        }

        if let Some(parent) = self.stack.last_mut() {
            match splice {
                Some(placeholder) => parent.children.push(ChildNode::Splice(placeholder)),
                None => parent.children = ChildList::Text(text),
            }
        }

        Ok(())
    }

    /// Attach a finished element to the innermost open element, or make it
    /// the root.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a root already exists.
    fn attach(&mut self, node: Node) -> Result<(), Error> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(ChildNode::Element(node));
            return Ok(());
        }
        if self.root.is_some() {
            return Err(self.error_multiple_roots(node.region));
        }
        self.root = Some(node);

        Ok(())
    }

    fn error_multiple_roots(&self, region: Region) -> Error {
        Error::structure(MULTIPLE_ROOTS)
            .with_pointer(self.source, region)
            .with_help("wrap sibling elements in a single parent element")
    }

    fn error_stray_text(&self, pending: &Buffer) -> Error {
        let help = if self.stack.is_empty() {
            "text must be placed inside the root element"
        } else {
            "an element holds either text or child elements, \
            wrap the text in an element of its own"
        };

        Error::structure(UNEXPECTED_TEXT)
            .with_pointer(self.source, trimmed_region(pending))
            .with_help(help)
    }
}

/// Separate a trailing self-closing `/` from trimmed tag content.
///
/// The slash self-closes only when it follows the tag name, whitespace or a
/// closing quote. Otherwise it ends an unquoted value, as in `<a href=/>`.
fn split_self_closing(content: &str) -> (&str, bool) {
    let Some(rest) = content.strip_suffix('/') else {
        return (content, false);
    };

    let closes = rest.ends_with(|c: char| c.is_whitespace() || matches!(c, '\'' | '"'))
        || !rest.contains(char::is_whitespace);
    if closes {
        (rest.trim_end(), true)
    } else {
        (content, false)
    }
}

/// Region of the buffer without its surrounding whitespace.
fn trimmed_region(buffer: &Buffer) -> Region {
    let begin = buffer.begin + buffer.text.len() - buffer.text.trim_start().len();

    Region::new(begin..begin + buffer.text.trim().len())
}
