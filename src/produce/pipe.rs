use crate::{
    compile::tree::{Fragment, Text},
    props::Props,
    report::{error_missing_property, Error, ErrorKind, WRITE_FAILED},
};
use serde_json::Value;
use std::fmt::{Arguments, Display, Result, Write};

/// Wraps some underlying buffer by providing methods that write to it
/// in different formats.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut String) -> Self {
        Self { buffer }
    }

    /// Write the given Value to the Pipe buffer.
    ///
    /// Strings are written verbatim, arrays as a comma separated list and
    /// objects as JSON.
    ///
    /// # Errors
    ///
    /// The Pipe supports all Value types, so the only error that will
    /// be returned is propagated from the [write!] macro itself.
    pub fn write_value(&mut self, value: &Value) -> Result {
        match value {
            Value::Null => self.write_null(),
            Value::String(string) => self.write_str(string),
            Value::Array(array) => self.write_array(array),
            _ => self.write_display(value),
        }
    }

    /// Write the value to the buffer using the Display implementation.
    fn write_display(&mut self, value: impl Display) -> Result {
        write!(self.buffer, "{value}")
    }

    /// Write the literal text "null" to the buffer.
    fn write_null(&mut self) -> Result {
        write!(self.buffer, "null")
    }

    /// Write the items separated by commas, without brackets.
    ///
    /// A null item is written as nothing.
    fn write_array(&mut self, array: &[Value]) -> Result {
        for (index, item) in array.iter().enumerate() {
            if index > 0 {
                self.write_char(',')?;
            }
            if !item.is_null() {
                self.write_value(item)?;
            }
        }

        Ok(())
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        Write::write_str(self.buffer, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> Result {
        Write::write_char(self.buffer, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: Arguments<'_>) -> Result {
        Write::write_fmt(self.buffer, args)
    }
}

/// Resolve a [`Text`] against the given [`Props`].
///
/// # Errors
///
/// Returns an [`Error`] if the [`Text`] reads a placeholder that `props` does
/// not hold a value for.
pub fn resolve(text: &Text, props: &Props) -> std::result::Result<String, Error> {
    let mut buffer = String::new();
    let mut pipe = Pipe::new(&mut buffer);

    for fragment in &text.fragments {
        let result = match fragment {
            Fragment::Literal(literal) => pipe.write_str(literal),
            Fragment::Read(placeholder) => {
                let value = props
                    .get(*placeholder)
                    .ok_or_else(|| error_missing_property(placeholder, props.len()))?;
                pipe.write_value(value)
            }
        };
        result.map_err(|_| Error::build(ErrorKind::Value, WRITE_FAILED))?;
    }

    Ok(buffer)
}
