use super::{ChildPlan, DynamicPlan, EntryPlan, Plan};
use crate::{
    compile::{
        tree::{Fragment, Text},
        CacheKey,
    },
    element::{Child, Children, Element},
};

/// Render a [`Plan`] as producer source text.
///
/// The text is a function of `props` returning the element tree, followed by
/// a `sourceURL` comment naming the cache key.
///
/// # Examples
///
/// ```
/// use stencil::compile::{codegen::{to_source, Plan}, CacheKey};
/// use stencil::Element;
///
/// let plan = Plan::Static(Element::new("br"));
///
/// assert_eq!(
///     to_source(CacheKey::Hash(7), &plan),
///     "function(props){\"use strict\";return {tag:\"br\",attrs:{},children:[]}}\n//# sourceURL=7"
/// );
/// ```
pub fn to_source(key: CacheKey, plan: &Plan) -> String {
    let mut buffer = String::from("function(props){\"use strict\";return ");
    write_plan(&mut buffer, plan);
    buffer.push('}');
    buffer.push_str("\n//# sourceURL=");
    buffer.push_str(&key.to_string());

    buffer
}

fn write_plan(buffer: &mut String, plan: &Plan) {
    match plan {
        Plan::Static(element) => write_element(buffer, element),
        Plan::Dynamic(plan) => write_dynamic(buffer, plan),
    }
}

fn write_dynamic(buffer: &mut String, plan: &DynamicPlan) {
    buffer.push_str("{tag:");
    buffer.push_str(&string_literal(&plan.tag));
    if let Some(key) = &plan.key {
        buffer.push_str(",key:");
        write_text(buffer, key);
    }

    buffer.push_str(",attrs:{");
    for (index, (name, value)) in plan.attrs.iter().enumerate() {
        if index > 0 {
            buffer.push(',');
        }
        buffer.push_str(&string_literal(name));
        buffer.push(':');
        write_text(buffer, value);
    }

    buffer.push_str("},children:");
    match &plan.children {
        ChildPlan::Text(text) => write_text(buffer, text),
        ChildPlan::Nodes(entries) => {
            buffer.push('[');
            for (index, entry) in entries.iter().enumerate() {
                if index > 0 {
                    buffer.push(',');
                }
                match entry {
                    EntryPlan::Node(plan) => write_plan(buffer, plan),
                    EntryPlan::Splice(placeholder) => {
                        buffer.push_str("{children:props.");
                        buffer.push_str(placeholder.name());
                        buffer.push('}');
                    }
                }
            }
            buffer.push(']');
        }
    }
    buffer.push('}');
}

fn write_element(buffer: &mut String, element: &Element) {
    buffer.push_str("{tag:");
    buffer.push_str(&string_literal(&element.tag));
    if let Some(key) = &element.key {
        buffer.push_str(",key:");
        buffer.push_str(&string_literal(key));
    }

    buffer.push_str(",attrs:{");
    let attrs: Vec<_> = element
        .attrs
        .iter()
        .map(|(name, value)| format!("{}:{}", string_literal(name), string_literal(value)))
        .collect();
    buffer.push_str(&attrs.join(","));

    buffer.push_str("},children:");
    match &element.children {
        Children::Text(text) => buffer.push_str(&string_literal(text)),
        Children::Nodes(nodes) => {
            buffer.push('[');
            for (index, child) in nodes.iter().enumerate() {
                if index > 0 {
                    buffer.push(',');
                }
                // Static trees hold no splices.
                if let Child::Element(element) = child {
                    write_element(buffer, element);
                }
            }
            buffer.push(']');
        }
    }
    buffer.push('}');
}

/// Write a [`Text`] as a string expression.
///
/// Literals and reads are joined with `+`. A leading `""` keeps the
/// expression a string when it begins with a read.
fn write_text(buffer: &mut String, text: &Text) {
    if text.fragments.is_empty() {
        buffer.push_str("\"\"");
        return;
    }
    if matches!(text.fragments.first(), Some(Fragment::Read(_))) {
        buffer.push_str("\"\"+");
    }

    for (index, fragment) in text.fragments.iter().enumerate() {
        if index > 0 {
            buffer.push('+');
        }
        match fragment {
            Fragment::Literal(literal) => buffer.push_str(&string_literal(literal)),
            Fragment::Read(placeholder) => {
                buffer.push_str("props.");
                buffer.push_str(placeholder.name());
            }
        }
    }
}

/// Quote and escape text as a double-quoted string literal.
pub fn string_literal(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 8);
    output.push('"');
    for c in text.chars() {
        match c {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{2028}' => output.push_str("\\u2028"),
            '\u{2029}' => output.push_str("\\u2029"),
            _ => output.push(c),
        }
    }
    output.push('"');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{assemble, derive_key, generate, template_key, Parser, Syntax};
    use crate::Props;
    use serde_json::json;

    fn source(fragments: &[&str], props: &Props) -> String {
        let syntax = Syntax::default();
        let markup = assemble(fragments, props.len()).unwrap();
        let root = Parser::new(&markup, props, &syntax).parse().unwrap();
        generate(template_key(&markup, props.shapes()), &root).source
    }

    fn body(source: &str) -> &str {
        let begin = "function(props){\"use strict\";return ".len();
        let end = source.find("}\n//# sourceURL=").unwrap();
        &source[begin..end]
    }

    #[test]
    fn test_interpolated_text() {
        let props = Props::new().with_must("World");
        let output = source(&["<p>Hello ", "!</p>"], &props);

        assert_eq!(
            body(&output),
            r#"{tag:"p",attrs:{},children:"Hello "+props.$1+"!"}"#
        );
    }

    #[test]
    fn test_leading_read_stays_string() {
        let props = Props::new().with_must(1).with_must(2);
        let output = source(&["<p id=", ">", "</p>"], &props);

        assert_eq!(
            body(&output),
            r#"{tag:"p",attrs:{"id":""+props.$1},children:""+props.$2}"#
        );
    }

    #[test]
    fn test_key_and_splice() {
        let props = Props::new().with_must("7").with_must(json!([]));
        let output = source(&["<ul key=list-", "><li>a</li>", "</ul>"], &props);

        assert_eq!(
            body(&output),
            "{tag:\"ul\",key:\"list-\"+props.$1,attrs:{},children:[\
             {tag:\"li\",attrs:{},children:\"a\"},{children:props.$2}]}"
        );
    }

    #[test]
    fn test_source_url_names_key() {
        let output = source(&["<br>"], &Props::new());

        assert!(output.ends_with(&format!("//# sourceURL={}", derive_key("<br>"))));
    }

    #[test]
    fn test_source_url_of_each_key() {
        let plan = Plan::Static(Element::new("hr"));

        assert!(to_source(CacheKey::Empty, &plan).ends_with("}\n//# sourceURL="));
        assert!(to_source(CacheKey::Hash(-42), &plan).ends_with("}\n//# sourceURL=-42"));
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(string_literal("x\ty"), r#""x\ty""#);
    }
}
