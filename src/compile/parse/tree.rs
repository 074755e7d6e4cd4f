use crate::{
    compile::placeholder::{segments, Mark, Placeholder, Segment},
    region::Region,
};
use indexmap::IndexMap;

/// Piece of a [`Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Text copied as written.
    Literal(String),
    /// Live read of the property bound to the placeholder.
    Read(Placeholder),
}

/// Literal text concatenated with live property reads.
///
/// Used for attribute values, identity keys and interpolated child text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub fragments: Vec<Fragment>,
}

impl Text {
    /// Create a [`Text`] holding only the given literal.
    ///
    /// The empty literal has no fragments.
    pub fn literal<T>(text: T) -> Self
    where
        T: Into<String>,
    {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }

        Self {
            fragments: vec![Fragment::Literal(text)],
        }
    }

    /// Split the given markup text into literals and reads.
    ///
    /// `marks` locate the placeholder tokens, relative to `text`.
    pub fn scan(text: &str, marks: &[Mark]) -> Self {
        let fragments = segments(text, marks)
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(literal) => Fragment::Literal(literal.to_string()),
                Segment::Token(placeholder) => Fragment::Read(placeholder),
            })
            .collect();

        Self { fragments }
    }

    /// Scan child text, dropping line terminators and surrounding whitespace.
    ///
    /// `\r` and `\n` are removed from literal runs, then the text as a whole
    /// is trimmed. Blank text has no fragments.
    pub fn normalized(text: &str, marks: &[Mark]) -> Self {
        let mut fragments: Vec<Fragment> = segments(text, marks)
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(literal) => Fragment::Literal(
                    literal
                        .chars()
                        .filter(|c| !matches!(c, '\r' | '\n'))
                        .collect(),
                ),
                Segment::Token(placeholder) => Fragment::Read(placeholder),
            })
            .collect();

        if let Some(Fragment::Literal(first)) = fragments.first_mut() {
            *first = first.trim_start().to_string();
        }
        if let Some(Fragment::Literal(last)) = fragments.last_mut() {
            *last = last.trim_end().to_string();
        }
        fragments.retain(|fragment| {
            !matches!(fragment, Fragment::Literal(literal) if literal.is_empty())
        });

        Self { fragments }
    }

    /// Return true if the [`Text`] contains no reads.
    pub fn is_static(&self) -> bool {
        self.reads().next().is_none()
    }

    /// Return the concatenated literal value, if the [`Text`] contains no reads.
    pub fn as_literal(&self) -> Option<String> {
        let mut output = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(literal) => output.push_str(literal),
                Fragment::Read(_) => return None,
            }
        }

        Some(output)
    }

    /// Every placeholder read by this [`Text`], in order.
    pub fn reads(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Read(placeholder) => Some(*placeholder),
            Fragment::Literal(_) => None,
        })
    }
}

/// Content of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChildList {
    /// Text content.
    Text(Text),
    /// Elements and splices, in render order.
    Nodes(Vec<ChildNode>),
}

impl ChildList {
    /// Append a child.
    ///
    /// Nodes supersede text content.
    pub fn push(&mut self, child: ChildNode) {
        match self {
            ChildList::Nodes(nodes) => nodes.push(child),
            ChildList::Text(_) => *self = ChildList::Nodes(vec![child]),
        }
    }

    /// Return true if there is no content.
    pub fn is_empty(&self) -> bool {
        match self {
            ChildList::Nodes(nodes) => nodes.is_empty(),
            ChildList::Text(text) => text.fragments.is_empty(),
        }
    }
}

impl Default for ChildList {
    fn default() -> Self {
        ChildList::Nodes(vec![])
    }
}

/// Entry in [`ChildList::Nodes`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChildNode {
    /// A nested element.
    Element(Node),
    /// The list bound to the placeholder, inserted as child content.
    Splice(Placeholder),
}

/// One element of the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Tag name.
    pub tag: String,
    /// Attributes in the order they were written.
    pub attrs: IndexMap<String, Text>,
    /// Identity key, when the `key` attribute reads a placeholder.
    pub key: Option<Text>,
    /// Content of the element.
    pub children: ChildList,
    /// Location of the opening tag.
    pub region: Region,
}

impl Node {
    /// Return true if nothing in the subtree reads a property.
    pub fn is_static(&self) -> bool {
        self.key.as_ref().map_or(true, Text::is_static)
            && self.attrs.values().all(Text::is_static)
            && match &self.children {
                ChildList::Text(text) => text.is_static(),
                ChildList::Nodes(nodes) => nodes.iter().all(|child| match child {
                    ChildNode::Element(node) => node.is_static(),
                    ChildNode::Splice(_) => false,
                }),
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tag: &str) -> Node {
        Node {
            tag: tag.to_string(),
            attrs: IndexMap::new(),
            key: None,
            children: ChildList::default(),
            region: Region::default(),
        }
    }

    fn mark(offset: usize, number: usize) -> Mark {
        Mark::new(offset, Placeholder::new(number).unwrap())
    }

    #[test]
    fn test_text_literal_and_reads() {
        let text = Text::scan("Hello $1 and $2", &[mark(6, 1), mark(13, 2)]);

        assert!(!text.is_static());
        assert_eq!(text.as_literal(), None);
        assert_eq!(text.reads().map(|p| p.number()).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(Text::scan("plain", &[]).as_literal().as_deref(), Some("plain"));
    }

    #[test]
    fn test_empty_literal() {
        assert_eq!(Text::literal(""), Text::scan("", &[]));
        assert_eq!(Text::literal("").as_literal().as_deref(), Some(""));
    }

    #[test]
    fn test_normalized_keeps_reads_in_place() {
        let text = Text::normalized("\n  Total: $1\r\n  units  ", &[mark(10, 1)]);

        assert_eq!(
            text.fragments,
            vec![
                Fragment::Literal("Total: ".into()),
                Fragment::Read(Placeholder::new(1).unwrap()),
                Fragment::Literal("  units".into()),
            ]
        );
        assert!(Text::normalized(" \t\r\n ", &[]).fragments.is_empty());
    }

    #[test]
    fn test_node_static_propagates() {
        let mut parent = node("ul");
        let mut child = node("li");
        child.children = ChildList::Text(Text::literal("x"));
        parent.children.push(ChildNode::Element(child.clone()));
        assert!(parent.is_static());

        child.attrs.insert("id".into(), Text::scan("$1", &[mark(0, 1)]));
        parent.children = ChildList::default();
        parent.children.push(ChildNode::Element(child));
        assert!(!parent.is_static());
    }

    #[test]
    fn test_splice_is_dynamic() {
        let mut parent = node("ul");
        parent
            .children
            .push(ChildNode::Splice(Placeholder::new(1).unwrap()));

        assert!(!parent.is_static());
    }
}
