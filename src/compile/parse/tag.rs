use crate::{
    compile::{
        placeholder::{mark_at, Mark},
        tree::Text,
    },
    region::Region,
    report::{Error, INVALID_NAME, UNTERMINATED_QUOTE},
};
use indexmap::IndexMap;

/// Name of the attribute that sets an element's identity key.
pub const KEY_ATTRIBUTE: &str = "key";

/// The parts of an opening tag.
#[derive(Debug, PartialEq)]
pub struct TagData {
    /// Tag name.
    pub tag: String,
    /// Attributes in the order they were written.
    pub attrs: IndexMap<String, Text>,
    /// Identity key built from a `key` attribute that reads a placeholder.
    pub key: Option<Text>,
}

impl TagData {
    /// Create a [`TagData`] with a name and nothing else.
    pub fn bare<T>(tag: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            key: None,
        }
    }
}

/// One whitespace-separated part of a tag, quotes removed.
struct Part {
    text: String,
    region: Region,
    /// Tokens within `text`, offsets relative to it.
    marks: Vec<Mark>,
}

/// Split the content of an opening tag into name, attributes and key.
///
/// `content` is the text between `<` and `>`, found at byte `offset` within
/// `source`. `marks` locate every placeholder token of `source`, and the ones
/// inside attribute values become live reads.
///
/// # Errors
///
/// Returns an [`Error`] when a quote is left open, or when the tag name or an
/// attribute name is not a valid name.
pub fn parse_tag(source: &str, content: &str, offset: usize, marks: &[Mark]) -> Result<TagData, Error> {
    let mut parts = split_parts(source, content, offset, marks)?.into_iter();

    let tag = match parts.next() {
        Some(part) => part,
        None => return Err(error_name(source, Region::new(offset..offset), "tag")),
    };
    if !tag.marks.is_empty() || !is_tag_name(&tag.text) {
        return Err(error_name(source, tag.region, "tag"));
    }

    let mut data = TagData::bare(tag.text);

    for part in parts {
        let (name, value) = part.text.split_once('=').unwrap_or((part.text.as_str(), ""));
        let value_begin = name.len() + 1;
        if part.marks.iter().any(|mark| mark.offset < value_begin) || !is_attribute_name(name) {
            return Err(error_name(source, part.region, "attribute"));
        }

        let value_marks: Vec<Mark> = part
            .marks
            .iter()
            .map(|mark| Mark::new(mark.offset - value_begin, mark.placeholder))
            .collect();
        let value = Text::scan(value, &value_marks);
        if name == KEY_ATTRIBUTE && !value.is_static() {
            data.key = Some(value);
        } else {
            data.attrs.insert(name.to_string(), value);
        }
    }

    Ok(data)
}

/// Split on whitespace found outside of quotes.
///
/// A quote opens a run that only the same quote character closes. Quotes are
/// removed, and a closing quote always ends the current part. A marked token
/// is copied whole.
fn split_parts(source: &str, content: &str, offset: usize, marks: &[Mark]) -> Result<Vec<Part>, Error> {
    let mut parts = vec![];
    let mut current = String::new();
    let mut current_marks = vec![];
    let mut begin = offset;
    let mut quote: Option<(char, usize)> = None;
    let mut token_end = offset;

    let mut finish = |current: &mut String, current_marks: &mut Vec<Mark>, begin: usize, end: usize| {
        if !current.is_empty() {
            parts.push(Part {
                text: std::mem::take(current),
                region: Region::new(begin..end),
                marks: std::mem::take(current_marks),
            });
        }
    };

    for (index, char) in content.char_indices() {
        let at = offset + index;
        if at < token_end {
            continue;
        }

        if let Some(placeholder) = mark_at(marks, at) {
            if current.is_empty() && quote.is_none() {
                begin = at;
            }
            current_marks.push(Mark::new(current.len(), placeholder));
            current.push_str(placeholder.name());
            token_end = at + placeholder.name().len();
            continue;
        }

        match (quote, char) {
            (None, c) if c.is_whitespace() => {
                finish(&mut current, &mut current_marks, begin, at);
                begin = at + c.len_utf8();
            }
            (None, '\'' | '"') => quote = Some((char, at)),
            (Some((open, _)), c) if c == open => {
                quote = None;
                finish(&mut current, &mut current_marks, begin, at + 1);
                begin = at + 1;
            }
            (_, c) => {
                if current.is_empty() && quote.is_none() {
                    begin = at;
                }
                current.push(c)
            }
        }
    }

    if let Some((open, at)) = quote {
        return Err(Error::structure(UNTERMINATED_QUOTE)
            .with_pointer(source, Region::at(at, open))
            .with_help(format!("close the value with `{open}`")));
    }
    finish(&mut current, &mut current_marks, begin, offset + content.len());

    Ok(parts)
}

/// Return an [`Error`] describing an invalid tag or attribute name.
fn error_name(source: &str, region: Region, what: &str) -> Error {
    Error::structure(INVALID_NAME)
        .with_pointer(source, region)
        .with_help(format!(
            "a {what} name begins with a letter or `_` and continues with letters, \
            digits, `_`, `-`, `:` or `.`"
        ))
}

/// Return true if the given text is a valid tag name.
pub fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start) && chars.all(is_name_continue)
}

/// Return true if the given text is a valid attribute name.
///
/// Attribute names may also begin with `:` or `@`.
pub fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| is_name_start(c) || matches!(c, ':' | '@'))
        && chars.all(is_name_continue)
}

/// Return true if the given character is '_' or an `xid_start`.
fn is_name_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Return true if the given character is an `xid_continue`, '-', ':' or '.'.
fn is_name_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || matches!(c, '-' | ':' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compile::{assemble, tree::Fragment, Placeholder},
        ErrorKind,
    };

    /// Parse the tag `<` + fragments + `>`, with one value between each fragment.
    fn parse(fragments: &[&str]) -> Result<TagData, Error> {
        let mut owned: Vec<String> = fragments.iter().map(|f| f.to_string()).collect();
        owned[0].insert(0, '<');
        if let Some(last) = owned.last_mut() {
            last.push('>');
        }

        let markup = assemble(&owned, owned.len() - 1).unwrap();
        let source = markup.as_str();
        parse_tag(source, &source[1..source.len() - 1], 1, markup.marks())
    }

    fn read(number: usize) -> Fragment {
        Fragment::Read(Placeholder::new(number).unwrap())
    }

    #[test]
    fn test_literal_attributes_in_order() {
        let data = parse(&["div class='x' id=main"]).unwrap();

        assert_eq!(data.tag, "div");
        assert_eq!(
            data.attrs.keys().collect::<Vec<_>>(),
            vec!["class", "id"]
        );
        assert_eq!(data.attrs["class"], Text::literal("x"));
        assert_eq!(data.attrs["id"], Text::literal("main"));
        assert_eq!(data.key, None);
    }

    #[test]
    fn test_quoted_value_keeps_spaces() {
        let data = parse(&[r#"p title="a b  c" lang='en'"#]).unwrap();

        assert_eq!(data.attrs["title"], Text::literal("a b  c"));
        assert_eq!(data.attrs["lang"], Text::literal("en"));
    }

    #[test]
    fn test_other_quote_inside_quotes() {
        let data = parse(&[r#"p title="it's""#]).unwrap();

        assert_eq!(data.attrs["title"], Text::literal("it's"));
    }

    #[test]
    fn test_placeholder_value() {
        let data = parse(&["div id=", " class=item-", "-x"]).unwrap();

        assert_eq!(data.attrs["id"].fragments, vec![read(1)]);
        assert_eq!(
            data.attrs["class"].fragments,
            vec![
                Fragment::Literal("item-".into()),
                read(2),
                Fragment::Literal("-x".into())
            ]
        );
    }

    #[test]
    fn test_key_with_placeholder() {
        let data = parse(&["li key=row-", " class=row"]).unwrap();

        assert_eq!(
            data.key.unwrap().fragments,
            vec![Fragment::Literal("row-".into()), read(1)]
        );
        assert!(!data.attrs.contains_key("key"));
        assert_eq!(data.attrs["class"], Text::literal("row"));
    }

    #[test]
    fn test_literal_key_is_attribute() {
        let data = parse(&["li key=fixed"]).unwrap();

        assert_eq!(data.key, None);
        assert_eq!(data.attrs["key"], Text::literal("fixed"));
    }

    #[test]
    fn test_boolean_and_empty_attributes() {
        let data = parse(&["input disabled value=''  data-x=a=b"]).unwrap();

        assert_eq!(data.attrs["disabled"], Text::literal(""));
        assert_eq!(data.attrs["value"], Text::literal(""));
        assert_eq!(data.attrs["data-x"], Text::literal("a=b"));
    }

    #[test]
    fn test_whitespace_kinds_separate() {
        let data = parse(&["div\n\tid=a"]).unwrap();

        assert_eq!(data.tag, "div");
        assert_eq!(data.attrs["id"], Text::literal("a"));
    }

    #[test]
    fn test_unterminated_quote() {
        let error = parse(&["div class='x"]).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Structure);
        assert_eq!(error.reason(), UNTERMINATED_QUOTE);
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(parse(&["", " id=a"]).unwrap_err().reason(), INVALID_NAME);
        assert_eq!(parse(&["div =a"]).unwrap_err().reason(), INVALID_NAME);
        assert!(parse(&["div @click=go :value=", ""]).is_ok());
    }

    #[test]
    fn test_literal_sigil_in_value() {
        let data = parse(&["a title=$1 href=", "0"]).unwrap();

        assert_eq!(data.attrs["title"], Text::literal("$1"));
        assert_eq!(
            data.attrs["href"].fragments,
            vec![read(1), Fragment::Literal("0".into())]
        );
    }

    #[test]
    fn test_quoted_placeholder_value() {
        let data = parse(&["p title=\"a ", " b\""]).unwrap();

        assert_eq!(
            data.attrs["title"].fragments,
            vec![
                Fragment::Literal("a ".into()),
                read(1),
                Fragment::Literal(" b".into())
            ]
        );
    }

    #[test]
    fn test_name_rules() {
        assert!(is_tag_name("my-element"));
        assert!(is_tag_name("svg:rect"));
        assert!(!is_tag_name("1div"));
        assert!(!is_tag_name(""));
        assert!(is_attribute_name("aria-label"));
        assert!(!is_attribute_name("-x"));
    }
}
