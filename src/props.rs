use crate::{
    compile::{Placeholder, POOL_SIZE},
    report::{error_too_many_values, Error, ErrorKind},
};
use serde::Serialize;
use serde_json::{to_value, Value};

/// Runtime shape of a property, which decides whether a placeholder in child
/// text is spliced as a list or interpolated as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A JSON array, spliced as the element's child content.
    List,
    /// Any other value, interpolated into text.
    Scalar,
}

impl Shape {
    /// Return the [`Shape`] of the given [`Value`].
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Shape::List,
            _ => Shape::Scalar,
        }
    }

    /// Character used for this [`Shape`] when deriving a cache key.
    pub fn signature(self) -> char {
        match self {
            Shape::List => '[',
            Shape::Scalar => '=',
        }
    }
}

/// The dynamic values of one invocation, bound positionally to `$1`, `$2`, ...
///
/// A `Props` belongs to a single invocation and is passed by reference through
/// the whole pipeline, so nested or concurrent invocations never observe each
/// other's values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: Vec<Value>,
}

impl Props {
    /// Create a new, empty [`Props`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil::Props;
    ///
    /// let props = Props::new();
    /// assert!(props.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self { values: vec![] }
    }

    /// Append a value, bound to the next placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails, or if the placeholder pool
    /// is already full.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil::Props;
    ///
    /// let mut props = Props::new();
    /// let result = props.push("World");
    ///
    /// assert!(result.is_ok());
    /// ```
    pub fn push<T>(&mut self, value: T) -> Result<(), Error>
    where
        T: Serialize,
    {
        if self.values.len() == POOL_SIZE {
            return Err(error_too_many_values(POOL_SIZE + 1));
        }
        let value = to_value(value).map_err(|e| {
            Error::build(ErrorKind::Value, "value is unserializable").with_help(e.to_string())
        })?;
        self.values.push(value);

        Ok(())
    }

    /// Append a value, bound to the next placeholder.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails or the placeholder pool is full.
    #[inline]
    pub fn push_must<T>(&mut self, value: T)
    where
        T: Serialize,
    {
        self.push(value).unwrap()
    }

    /// Append a value.
    ///
    /// Returns the `Props`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails, or if the placeholder pool
    /// is already full.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil::Props;
    ///
    /// let props = Props::new().with("a").and_then(|p| p.with(vec![1, 2]));
    ///
    /// assert!(props.is_ok());
    /// ```
    #[inline]
    pub fn with<T>(mut self, value: T) -> Result<Self, Error>
    where
        T: Serialize,
    {
        self.push(value)?;

        Ok(self)
    }

    /// Append a value.
    ///
    /// Returns the `Props`, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails or the placeholder pool is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil::Props;
    ///
    /// let props = Props::new().with_must("a").with_must(42);
    /// assert_eq!(props.len(), 2);
    /// ```
    #[inline]
    pub fn with_must<T>(mut self, value: T) -> Self
    where
        T: Serialize,
    {
        self.push_must(value);

        self
    }

    /// Returns a reference to the [`Value`] bound to the placeholder.
    #[inline]
    pub fn get(&self, placeholder: Placeholder) -> Option<&Value> {
        self.values.get(placeholder.index())
    }

    /// Returns the [`Shape`] of the value bound to the placeholder.
    #[inline]
    pub fn shape(&self, placeholder: Placeholder) -> Option<Shape> {
        self.get(placeholder).map(Shape::of)
    }

    /// Returns the [`Shape`] of every value, in order.
    pub fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        self.values.iter().map(Shape::of)
    }

    /// Number of values held.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Props {
    /// Bind the values positionally.
    ///
    /// No pool check happens here; templates reject oversized props when they
    /// are assembled.
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}
