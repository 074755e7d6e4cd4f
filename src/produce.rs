//! Producers and the hosts that install them.
//!
//! A [`Producer`] is the specialized form of one template. It is created once
//! by a [`Host`] from a compiled [`Plan`][`crate::compile::Plan`] and then
//! invoked with fresh [`Props`] on every render.
mod host;
mod pipe;

pub use host::{ClosureHost, Host};
pub use pipe::{resolve, Pipe};

use crate::{element::Element, props::Props, report::Error};

/// Builds an [`Element`] tree from the values of one invocation.
///
/// Implemented for every matching closure.
///
/// # Examples
///
/// ```
/// use stencil::{Element, Error, Producer, Props};
///
/// let producer = |_: &Props| Ok::<_, Error>(Element::new("br"));
///
/// assert_eq!(producer.produce(&Props::new()).unwrap().tag, "br");
/// ```
pub trait Producer: Send + Sync {
    /// Build the tree.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a property read by the template is absent, or
    /// bound to a value of the wrong shape.
    fn produce(&self, props: &Props) -> Result<Element, Error>;
}

impl<F> Producer for F
where
    F: Fn(&Props) -> Result<Element, Error> + Send + Sync,
{
    #[inline]
    fn produce(&self, props: &Props) -> Result<Element, Error> {
        self(props)
    }
}
