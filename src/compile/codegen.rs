//! Code generation.
//!
//! Walks a parse tree once and produces a [`Plan`]: the specialized program a
//! [`Host`][`crate::Host`] turns into a producer. Subtrees that read no
//! property are built into [`Element`] values here, so producing them later
//! is a clone. The same walk renders the program as source text, kept for
//! diagnostics and for hosts that compile text.
mod source;

use crate::{
    compile::{
        tree::{ChildList, ChildNode, Node, Text},
        CacheKey, Placeholder,
    },
    element::{Child, Children, Element},
};

pub use source::{string_literal, to_source};

/// Program that builds one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// A subtree without property reads, built once.
    Static(Element),
    /// An element that reads properties in its key, attributes or content.
    Dynamic(DynamicPlan),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicPlan {
    pub tag: String,
    pub key: Option<Text>,
    /// Attributes in the order they were written.
    pub attrs: Vec<(String, Text)>,
    pub children: ChildPlan,
}

/// Program that builds the content of a [`DynamicPlan`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChildPlan {
    /// Text, possibly interpolated.
    Text(Text),
    Nodes(Vec<EntryPlan>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryPlan {
    Node(Plan),
    /// Insert the list bound to the placeholder.
    Splice(Placeholder),
}

/// Output of the code generator for one template.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Key the producer will be cached under.
    pub key: CacheKey,
    /// Producer source text.
    pub source: String,
    pub plan: Plan,
}

/// Generate the [`Plan`] and source text for the tree rooted at `root`.
///
/// Never looks at a property value, only at the tree.
pub fn generate(key: CacheKey, root: &Node) -> Generated {
    let plan = plan(root);
    let source = to_source(key, &plan);

    Generated { key, source, plan }
}

fn plan(node: &Node) -> Plan {
    if node.is_static() {
        return Plan::Static(materialize(node));
    }

    let children = match &node.children {
        ChildList::Text(text) => ChildPlan::Text(text.clone()),
        ChildList::Nodes(nodes) => ChildPlan::Nodes(
            nodes
                .iter()
                .map(|child| match child {
                    ChildNode::Element(node) => EntryPlan::Node(plan(node)),
                    ChildNode::Splice(placeholder) => EntryPlan::Splice(*placeholder),
                })
                .collect(),
        ),
    };

    Plan::Dynamic(DynamicPlan {
        tag: node.tag.clone(),
        key: node.key.clone(),
        attrs: node
            .attrs
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        children,
    })
}

/// Build the [`Element`] for a subtree that reads no property.
fn materialize(node: &Node) -> Element {
    let children = match &node.children {
        ChildList::Text(text) => Children::Text(text.as_literal().unwrap_or_default()),
        ChildList::Nodes(nodes) => Children::Nodes(
            nodes
                .iter()
                .filter_map(|child| match child {
                    ChildNode::Element(node) => Some(Child::Element(materialize(node))),
                    ChildNode::Splice(_) => None,
                })
                .collect(),
        ),
    };

    Element {
        tag: node.tag.clone(),
        key: node.key.as_ref().and_then(Text::as_literal),
        attrs: node
            .attrs
            .iter()
            .map(|(name, value)| (name.clone(), value.as_literal().unwrap_or_default()))
            .collect(),
        children,
    }
}
