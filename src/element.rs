use crate::compile::Placeholder;
use indexmap::IndexMap;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use serde_json::Value;

/// Element descriptor produced by a compiled template.
///
/// Serializes as `{"tag":..,"key":..,"attrs":{..},"children":..}`, with `key`
/// omitted when absent, so a tree can be handed to a view layer as JSON.
///
/// # Examples
///
/// ```
/// use stencil::Element;
/// use serde_json::json;
///
/// let element = Element::new("li").with_key("row-1").with_text("first");
///
/// assert_eq!(
///     element.to_value(),
///     json!({"tag": "li", "key": "row-1", "attrs": {}, "children": "first"})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub attrs: IndexMap<String, String>,
    pub children: Children,
}

impl Element {
    /// Create an [`Element`] with the given tag and no content.
    pub fn new<T>(tag: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            tag: tag.into(),
            key: None,
            attrs: IndexMap::new(),
            children: Children::default(),
        }
    }

    /// Set an attribute.
    ///
    /// Returns the [`Element`], so additional methods may be chained.
    pub fn with_attr<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attrs.insert(name.into(), value.into());

        self
    }

    /// Set the identity key.
    ///
    /// Returns the [`Element`], so additional methods may be chained.
    pub fn with_key<T>(mut self, key: T) -> Self
    where
        T: Into<String>,
    {
        self.key = Some(key.into());

        self
    }

    /// Replace the content with text.
    ///
    /// Returns the [`Element`], so additional methods may be chained.
    pub fn with_text<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.children = Children::Text(text.into());

        self
    }

    /// Append a child.
    ///
    /// Text content is replaced, since an element holds either text or nodes.
    ///
    /// Returns the [`Element`], so additional methods may be chained.
    pub fn with_child<T>(mut self, child: T) -> Self
    where
        T: Into<Child>,
    {
        match &mut self.children {
            Children::Nodes(nodes) => nodes.push(child.into()),
            Children::Text(_) => self.children = Children::Nodes(vec![child.into()]),
        }

        self
    }

    /// Return the attribute value with the given name.
    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Return the text content, if the element holds text.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match &self.children {
            Children::Text(text) => Some(text),
            Children::Nodes(_) => None,
        }
    }

    /// Return the child elements, skipping splices.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.nodes().iter().filter_map(|child| match child {
            Child::Element(element) => Some(element),
            Child::Splice(_) => None,
        })
    }

    /// Return the JSON form of this [`Element`].
    pub fn to_value(&self) -> Value {
        // Maps keyed by `String` and plain strings cannot fail to serialize.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Content of an [`Element`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Children {
    /// Text with line terminators stripped and surrounding whitespace trimmed.
    Text(String),
    /// Elements and splices, in render order.
    Nodes(Vec<Child>),
}

impl Children {
    /// Return the nodes, or an empty slice when the content is text.
    pub fn nodes(&self) -> &[Child] {
        match self {
            Children::Nodes(nodes) => nodes,
            Children::Text(_) => &[],
        }
    }

    /// Return true if there is no content.
    pub fn is_empty(&self) -> bool {
        match self {
            Children::Nodes(nodes) => nodes.is_empty(),
            Children::Text(text) => text.is_empty(),
        }
    }
}

impl Default for Children {
    fn default() -> Self {
        Children::Nodes(vec![])
    }
}

/// Entry in [`Children::Nodes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Child {
    Element(Element),
    Splice(Splice),
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}

impl From<Splice> for Child {
    fn from(splice: Splice) -> Self {
        Child::Splice(splice)
    }
}

/// A list-valued property inserted as child content.
///
/// Holds the list exactly as supplied. Serializes as `{"children":[..]}`, the
/// shape a view layer expects for a nested fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Splice {
    /// Placeholder the list was bound to.
    pub placeholder: Placeholder,
    pub items: Vec<Value>,
}

impl Serialize for Splice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Splice", 1)?;
        state.serialize_field("children", &self.items)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_tree() {
        let element = Element::new("ul")
            .with_attr("class", "list")
            .with_child(Element::new("li").with_text("a"))
            .with_child(Splice {
                placeholder: Placeholder::new(1).unwrap(),
                items: vec![json!({"tag": "li"}), json!("b")],
            });

        assert_eq!(
            element.to_value(),
            json!({
                "tag": "ul",
                "attrs": {"class": "list"},
                "children": [
                    {"tag": "li", "attrs": {}, "children": "a"},
                    {"children": [{"tag": "li"}, "b"]}
                ]
            })
        );
    }

    #[test]
    fn test_serialize_splice_alone() {
        let splice = Splice {
            placeholder: Placeholder::new(2).unwrap(),
            items: vec![json!(1), json!(null)],
        };

        assert_eq!(serde_json::to_string(&splice).unwrap(), r#"{"children":[1,null]}"#);
    }

    #[test]
    fn test_attribute_order_kept() {
        let element = Element::new("a").with_attr("z", "1").with_attr("a", "2");
        let output = serde_json::to_string(&element).unwrap();

        assert_eq!(output, r#"{"tag":"a","attrs":{"z":"1","a":"2"},"children":[]}"#);
    }

    #[test]
    fn test_child_replaces_text() {
        let element = Element::new("p")
            .with_text("x")
            .with_child(Element::new("b"));

        assert_eq!(element.text(), None);
        assert_eq!(element.elements().count(), 1);
    }
}
