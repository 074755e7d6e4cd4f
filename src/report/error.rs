use super::{Pointer, RED, RESET};
use crate::{region::Region, report::Visual};
use std::fmt::{self, Debug, Display, Formatter};

/// Broad category of an [`Error`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// The markup is malformed: multiple roots, unclosed or mismatched tags,
    /// stray text, unterminated quotes.
    Structure,
    /// The invocation supplied more values than the placeholder pool holds,
    /// or the fragment count does not match the value count.
    Arity,
    /// A producer or a property was expected but is absent.
    Lookup,
    /// A value could not be turned into a property.
    Value,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Structure => write!(f, "structure"),
            ErrorKind::Arity => write!(f, "arity"),
            ErrorKind::Lookup => write!(f, "lookup"),
            ErrorKind::Value => write!(f, "value"),
        }
    }
}

/// Describes an error, and allows adding a contextual help text and visualization.
///
/// # Examples
///
/// Creating an [`Error`] that points at the offending part of a template:
///
/// ```
/// use stencil::{Error, ErrorKind};
///
/// let error = Error::build(ErrorKind::Structure, "mismatched closing tag")
///     .with_pointer("<div></span>", 5..12)
///     .with_name("-1520254411")
///     .with_help("expected `</div>`");
///
/// assert_eq!(error.kind(), ErrorKind::Structure);
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this output:
///
/// ```text
/// error: mismatched closing tag
///   --> -1520254411:1:6
///    |
///  1 | <div></span>
///    |      ^^^^^^^
///    |
///   = help: expected `</div>`
/// ```
pub struct Error {
    /// Category of the [`Error`].
    kind: ErrorKind,
    /// Describes the cause of the [`Error`].
    reason: String,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual + Send + Sync>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The cache key of the template that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given kind and reason text.
    ///
    /// The additional fields may be populated using the various methods
    /// defined on `Error`.
    pub fn build<T>(kind: ErrorKind, reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            kind,
            reason: reason.into(),
            name: None,
            visual: None,
            help: None,
        }
    }

    /// Shortcut for an [`Error`] of kind [`ErrorKind::Structure`].
    pub fn structure<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Self::build(ErrorKind::Structure, reason)
    }

    /// Shortcut for an [`Error`] of kind [`ErrorKind::Arity`].
    pub fn arity<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Self::build(ErrorKind::Arity, reason)
    }

    /// Shortcut for an [`Error`] of kind [`ErrorKind::Lookup`].
    pub fn lookup<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Self::build(ErrorKind::Lookup, reason)
    }

    /// Set the name text, which identifies the template the [`Error`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate the
    /// cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + Send + Sync + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] over the given source text
    /// and [`Region`].
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the reason text.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Return the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Return the name of the template that the error is related to.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let header = format!("{RED}error{RESET}");
        write!(f, "{header}: {}", self.reason)?;

        if f.alternate() {
            match &self.visual {
                Some(visual) => {
                    return visual.display(f, self.name.as_deref(), self.help.as_deref())
                }
                None => {
                    if let Some(help) = &self.help {
                        write!(f, "\n = help: {help}")?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.reason == other.reason
            && self.help == other.help
            && self.name == other.name
    }
}

impl std::error::Error for Error {}
