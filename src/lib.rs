//! Stencil - Markup Templates
//!
//! Compiles markup with positional values into trees of [`Element`]
//! descriptors. Each distinct template shape is parsed once, specialized into
//! a producer, and cached, so later renders only run the producer.
//!
//! ```
//! use stencil::Props;
//! use serde_json::json;
//!
//! let props = Props::new().with_must("menu").with_must(json!(["a", "b"]));
//! let element = stencil::render(&["<ul class=", ">", "</ul>"], &props).unwrap();
//!
//! assert_eq!(element.attr("class"), Some("menu"));
//! assert_eq!(
//!     element.to_value(),
//!     json!({"tag": "ul", "attrs": {"class": "menu"}, "children": [{"children": ["a", "b"]}]})
//! );
//! ```
pub mod cache;
pub mod compile;

mod element;
mod engine;
mod flow;
mod produce;
mod props;
mod region;
mod report;

pub use crate::{
    compile::CacheKey,
    element::{Child, Children, Element, Splice},
    engine::Engine,
    flow::{is_truthy, when, Branch, Truthy},
    produce::{resolve, ClosureHost, Host, Pipe, Producer},
    props::{Props, Shape},
    region::Region,
    report::{Error, ErrorKind, Pointer, Visual},
};

use std::sync::OnceLock;

/// Render a template with the process-wide default [`Engine`].
///
/// # Errors
///
/// Returns an [`Error`] under the same conditions as [`Engine::render`].
pub fn render<S>(fragments: &[S], props: &Props) -> Result<Element, Error>
where
    S: AsRef<str>,
{
    static ENGINE: OnceLock<Engine> = OnceLock::new();

    ENGINE.get_or_init(Engine::new).render(fragments, props)
}
