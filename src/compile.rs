//! Template compilation.
//!
//! Turns static fragments and the shape of their values into a [`Generated`]
//! program: fragments are assembled into markup, the markup is parsed into a
//! tree, and the tree is walked by the code generator.
mod assemble;
mod key;
mod parse;
mod placeholder;
mod syntax;

pub mod codegen;

pub use crate::compile::{
    assemble::{assemble, Markup},
    codegen::{generate, ChildPlan, DynamicPlan, EntryPlan, Generated, Plan},
    key::{derive_key, template_identity, template_key, CacheKey},
    parse::{tag, tree, Parser},
    placeholder::{segments, Mark, Placeholder, Segment, POOL_SIZE, SIGIL},
    syntax::{Builder, Syntax, VOID_TAGS},
};

use crate::{props::Props, report::Error};

/// Compile assembled markup into a [`Generated`] program.
///
/// The shape of each value in `props` decides whether a placeholder in child
/// text is spliced or interpolated. Values themselves are never read. Errors
/// are named with `key`, so their pointer identifies the template.
///
/// # Examples
///
/// ```
/// use stencil::compile::{assemble, compile, template_key, Plan, Syntax};
/// use stencil::Props;
///
/// let props = Props::new().with_must("World");
/// let markup = assemble(&["<p>Hello ", "!</p>"], props.len()).unwrap();
/// let key = template_key(&markup, props.shapes());
///
/// let generated = compile(&markup, key, &props, &Syntax::default()).unwrap();
/// assert!(matches!(generated.plan, Plan::Dynamic(_)));
/// ```
pub fn compile(markup: &Markup, key: CacheKey, props: &Props, syntax: &Syntax) -> Result<Generated, Error> {
    let root = Parser::new(markup, props, syntax)
        .parse()
        .map_err(|error| name_error(error, key))?;

    Ok(generate(key, &root))
}

/// Name an [`Error`] with the [`CacheKey`] of the template it came from.
///
/// The empty key names nothing.
pub(crate) fn name_error(error: Error, key: CacheKey) -> Error {
    match key {
        CacheKey::Empty => error,
        CacheKey::Hash(_) => error.with_name(key.to_string()),
    }
}
