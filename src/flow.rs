//! Inline conditionals for building template values.
//!
//! ```
//! use stencil::when;
//!
//! let logged_in = false;
//! let label = when(logged_in, || "Sign out").otherwise(|| "Sign in");
//!
//! assert_eq!(label, "Sign in");
//! ```
use serde_json::Value;

/// Return true if the given [`Value`] is truthy.
///
/// `false`, `null`, zero, the empty string, the empty array and the empty
/// object are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(bo) => *bo,
        Value::Number(nu) => nu.as_f64().is_some_and(|nu| nu != 0.0 && !nu.is_nan()),
        Value::String(st) => !st.is_empty(),
        Value::Array(ar) => !ar.is_empty(),
        Value::Object(ob) => !ob.is_empty(),
        Value::Null => false,
    }
}

/// Types that may be used as the condition of [`when`].
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    #[inline]
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for Value {
    #[inline]
    fn is_truthy(&self) -> bool {
        is_truthy(self)
    }
}

impl Truthy for str {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for [T] {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Option<T>
where
    T: Truthy,
{
    #[inline]
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T> Truthy for &T
where
    T: Truthy + ?Sized,
{
    #[inline]
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

macro_rules! truthy_number {
    ($($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                #[inline]
                fn is_truthy(&self) -> bool {
                    *self != 0 as $ty
                }
            }
        )*
    };
}

truthy_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Truthy for f64 {
    #[inline]
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

/// Outcome of [`when`], waiting for the falsy branch.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "call `otherwise` to obtain the value"]
pub struct Branch<T> {
    value: Option<T>,
}

impl<T> Branch<T> {
    /// Return the value of the truthy branch, or call `falsy` if the condition
    /// was falsy.
    pub fn otherwise<F>(self, falsy: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.value.unwrap_or_else(falsy)
    }
}

/// Evaluate `truthy` now if the condition is truthy.
///
/// The falsy branch is supplied with [`Branch::otherwise`], and is only
/// called when the condition was falsy.
pub fn when<C, F, T>(condition: C, truthy: F) -> Branch<T>
where
    C: Truthy,
    F: FnOnce() -> T,
{
    Branch {
        value: condition.is_truthy().then(truthy),
    }
}
