use super::Error;
use crate::{compile::POOL_SIZE, region::Region};
use std::fmt::Display;

pub const MULTIPLE_ROOTS: &str = "multiple root elements";
pub const MISSING_ROOT: &str = "missing root element";
pub const MISMATCHED_TAG: &str = "mismatched closing tag";
pub const UNCLOSED_TAG: &str = "unclosed tag";
pub const UNTERMINATED_TAG: &str = "unterminated tag";
pub const UNTERMINATED_QUOTE: &str = "unterminated quote";
pub const UNEXPECTED_TEXT: &str = "unexpected text";
pub const INVALID_NAME: &str = "invalid name";
pub const TOO_MANY_VALUES: &str = "too many values";
pub const FRAGMENT_MISMATCH: &str = "fragment count mismatch";
pub const MISSING_PRODUCER: &str = "missing producer";
pub const AMBIGUOUS_KEY: &str = "ambiguous cache key";
pub const MISSING_PROPERTY: &str = "missing property";
pub const EXPECTED_LIST: &str = "expected a list";
pub const WRITE_FAILED: &str = "failed to write to buffer";

/// Return an [`Error`] explaining that the markup ended while inside a tag.
pub fn error_unterminated_tag(source: &str, region: Region) -> Error {
    Error::structure(UNTERMINATED_TAG)
        .with_pointer(source, region)
        .with_help("close the tag with `>`")
}

/// Return an [`Error`] explaining that more values were supplied than
/// the placeholder pool can hold.
pub fn error_too_many_values(received: usize) -> Error {
    Error::arity(TOO_MANY_VALUES).with_help(format!(
        "a template accepts at most {POOL_SIZE} values, received {received}"
    ))
}

/// Return an [`Error`] explaining that the static fragments do not
/// surround the values.
pub fn error_fragment_mismatch(fragments: usize, values: usize) -> Error {
    Error::arity(FRAGMENT_MISMATCH).with_help(format!(
        "{values} values require {} static fragments, received {fragments}",
        values + 1
    ))
}

/// Return an [`Error`] describing a cache key without a producer.
pub fn error_missing_producer<T>(key: T) -> Error
where
    T: Display,
{
    Error::lookup(MISSING_PRODUCER).with_help(format!(
        "no producer is cached under key `{key}`, compile the template first"
    ))
}

/// Return an [`Error`] describing a cache key shared by several templates.
pub fn error_ambiguous_key<T>(key: T, templates: usize) -> Error
where
    T: Display,
{
    Error::lookup(AMBIGUOUS_KEY).with_help(format!(
        "{templates} different templates hash to key `{key}`, render them by their fragments instead"
    ))
}

/// Return an [`Error`] describing a read of a property that was not supplied.
pub fn error_missing_property<T>(placeholder: T, supplied: usize) -> Error
where
    T: Display,
{
    Error::lookup(MISSING_PROPERTY).with_help(format!(
        "`{placeholder}` was read but only {supplied} values were supplied"
    ))
}

/// Return an [`Error`] describing a splice whose property is no longer a list.
pub fn error_expected_list<T>(placeholder: T) -> Error
where
    T: Display,
{
    Error::lookup(EXPECTED_LIST).with_help(format!(
        "`{placeholder}` was compiled as a splice and must be bound to an array"
    ))
}

/// Return a string describing the closing tag that was expected.
pub fn expected_closing<T>(open: Option<T>) -> String
where
    T: Display,
{
    match open {
        Some(tag) => format!("expected `</{tag}>`"),
        None => "no element is open here".to_string(),
    }
}
