use crate::{
    cache::ProducerCache,
    compile::{assemble, compile, derive_key, name_error, template_identity, CacheKey, Syntax},
    element::Element,
    produce::{ClosureHost, Host, Producer},
    props::Props,
    report::Error,
};
use std::{
    fmt::{self, Debug, Formatter},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// Facilitates compiling templates into producers, caching them, and
/// invoking them with the values of each render.
///
/// An [`Engine`] may be shared across threads. Every distinct template shape
/// is parsed and generated at most once, see [`Engine::compilations`].
///
/// # Examples
///
/// ```
/// use stencil::{Engine, Props};
///
/// let engine = Engine::new();
/// let props = Props::new().with_must("World");
/// let element = engine.render(&["<p>Hello ", "!</p>"], &props).unwrap();
///
/// assert_eq!(element.text(), Some("Hello World!"));
/// ```
pub struct Engine {
    /// Settings used to read markup.
    syntax: Syntax,
    /// Installs compiled programs.
    host: Box<dyn Host>,
    /// Producers this Engine has compiled.
    cache: ProducerCache,
    /// Number of parse and generate passes run.
    compilations: AtomicUsize,
}

impl Engine {
    /// Create a new [`Engine`] with the default [`Syntax`] and a
    /// [`ClosureHost`].
    #[inline]
    pub fn new() -> Self {
        Self {
            syntax: Syntax::default(),
            host: Box::new(ClosureHost),
            cache: ProducerCache::new(),
            compilations: AtomicUsize::new(0),
        }
    }

    /// Set the [`Syntax`] used to read markup.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil::{compile::Builder, Engine, Props};
    ///
    /// let engine = Engine::new().with_syntax(Builder::new().with_void_tag("icon").to_syntax());
    /// let element = engine.render(&["<nav><icon><a>home</a></nav>"], &Props::new());
    ///
    /// assert_eq!(element.unwrap().elements().count(), 2);
    /// ```
    #[inline]
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;

        self
    }

    /// Set the [`Host`] that installs compiled programs.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    #[inline]
    pub fn with_host<H>(mut self, host: H) -> Self
    where
        H: Host + 'static,
    {
        self.host = Box::new(host);

        self
    }

    /// Render the template made of `fragments` with the given [`Props`].
    ///
    /// Compiles the template on first use of its shape, then invokes the
    /// cached producer.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the fragments and values do not line up, if
    /// the markup is malformed, or if the producer fails.
    pub fn render<S>(&self, fragments: &[S], props: &Props) -> Result<Element, Error>
    where
        S: AsRef<str>,
    {
        let (_, producer) = self.producer(fragments, props)?;

        producer.produce(props)
    }

    /// Compile the template made of `fragments`, unless a producer for its
    /// shape is already cached.
    ///
    /// Returns the [`CacheKey`] the producer is stored under. Values in
    /// `props` are only inspected for their [`Shape`][`crate::Shape`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the fragments and values do not line up, or if
    /// the markup is malformed. Nothing is cached in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil::{Engine, Props};
    ///
    /// let engine = Engine::new();
    /// let first = engine.compile(&["<b>", "</b>"], &Props::new().with_must("a"));
    /// let second = engine.compile(&["<b>", "</b>"], &Props::new().with_must("b"));
    ///
    /// assert_eq!(first.unwrap(), second.unwrap());
    /// assert_eq!(engine.compilations(), 1);
    /// ```
    pub fn compile<S>(&self, fragments: &[S], props: &Props) -> Result<CacheKey, Error>
    where
        S: AsRef<str>,
    {
        self.producer(fragments, props).map(|(key, _)| key)
    }

    /// Return the producer for the template made of `fragments`, compiling
    /// and caching it first when needed.
    ///
    /// A cached producer is only reused when its full template identity
    /// matches, so templates whose keys collide compile separately.
    fn producer<S>(&self, fragments: &[S], props: &Props) -> Result<(CacheKey, Arc<dyn Producer>), Error>
    where
        S: AsRef<str>,
    {
        let markup = assemble(fragments, props.len())?;
        let identity = template_identity(&markup, props.shapes());
        let key = derive_key(&identity);

        if let Some(producer) = self.cache.get(key, &identity) {
            log::debug!("producer cache hit for `{key}`");
            return Ok((key, producer));
        }
        if self.cache.contains(key) {
            log::debug!("producer cache collision for `{key}`, compiling");
        } else {
            log::debug!("producer cache miss for `{key}`, compiling");
        }

        let generated = compile(&markup, key, props, &self.syntax)?;
        self.compilations.fetch_add(1, Ordering::Relaxed);

        let producer = self
            .host
            .install(generated.key, &generated.source, generated.plan)
            .map_err(|error| name_error(error, key))?;
        self.cache.put(key, identity, Arc::clone(&producer));
        log::debug!("installed producer `{key}`");

        Ok((key, producer))
    }

    /// Invoke the producer cached under `key` with the given [`Props`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if no producer is cached under `key`, if several
    /// templates were compiled under `key`, or if the producer fails. Render
    /// through [`Engine::render`] to tell such templates apart.
    #[inline]
    pub fn invoke(&self, key: CacheKey, props: &Props) -> Result<Element, Error> {
        self.cache.invoke(key, props)
    }

    /// Number of times markup was parsed and generated by this [`Engine`].
    #[inline]
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Return the [`ProducerCache`] of this [`Engine`].
    #[inline]
    pub fn cache(&self) -> &ProducerCache {
        &self.cache
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("syntax", &self.syntax)
            .field("cache", &self.cache)
            .field("compilations", &self.compilations())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compile::{template_key, Plan},
        element::{Child, Children},
        produce::Producer,
        report::{AMBIGUOUS_KEY, MISMATCHED_TAG, MULTIPLE_ROOTS, TOO_MANY_VALUES},
        ErrorKind,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_same_shape_compiles_once() {
        let engine = Engine::new();
        let fragments = ["<li class=", ">", "</li>"];

        let a = engine
            .render(&fragments, &Props::new().with_must("x").with_must("one"))
            .unwrap();
        let b = engine
            .render(&fragments, &Props::new().with_must("y").with_must("two"))
            .unwrap();

        assert_eq!(engine.compilations(), 1);
        assert_eq!(engine.cache().len(), 1);
        assert_eq!(a, Element::new("li").with_attr("class", "x").with_text("one"));
        assert_eq!(b, Element::new("li").with_attr("class", "y").with_text("two"));
    }

    #[test]
    fn test_static_round_trip() {
        let engine = Engine::new();
        let element = engine
            .render(
                &["<section id=main>\n  <h1 class='t'>Title</h1>\n  <p>Body</p>\n</section>"],
                &Props::new(),
            )
            .unwrap();

        assert_eq!(
            element,
            Element::new("section")
                .with_attr("id", "main")
                .with_child(Element::new("h1").with_attr("class", "t").with_text("Title"))
                .with_child(Element::new("p").with_text("Body"))
        );
    }

    #[test]
    fn test_attribute_substitution() {
        let element = Engine::new()
            .render(&["<div id=", "></div>"], &Props::new().with_must("a"))
            .unwrap();

        assert_eq!(element.attr("id"), Some("a"));
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_list_splice() {
        let items = json!([{"tag": "li", "children": "one"}, {"tag": "li", "children": "two"}]);
        let element = Engine::new()
            .render(&["<ul>", "</ul>"], &Props::new().with_must(&items))
            .unwrap();

        match &element.children {
            Children::Nodes(nodes) => match nodes.as_slice() {
                [Child::Splice(splice)] => assert_eq!(Value::Array(splice.items.clone()), items),
                other => panic!("expected one splice, found {other:?}"),
            },
            Children::Text(text) => panic!("expected a splice, found text {text:?}"),
        }
        assert_eq!(
            element.to_value()["children"],
            json!([{"children": items}])
        );
    }

    #[test]
    fn test_text_interpolation() {
        let element = Engine::new()
            .render(&["<p>Hello ", "!</p>"], &Props::new().with_must("World"))
            .unwrap();

        assert_eq!(element.text(), Some("Hello World!"));
    }

    #[test]
    fn test_void_tag_siblings() {
        let element = Engine::new()
            .render(&["<div><br><span>x</span></div>"], &Props::new())
            .unwrap();
        let children: Vec<_> = element.elements().collect();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0], &Element::new("br"));
        assert_eq!(children[1].text(), Some("x"));
    }

    #[test]
    fn test_key_attribute() {
        let element = Engine::new()
            .render(&["<li key=item-", ">x</li>"], &Props::new().with_must(3))
            .unwrap();

        assert_eq!(element.key.as_deref(), Some("item-3"));
        assert_eq!(element.attr("key"), None);
    }

    #[test]
    fn test_key_stability() {
        let engine = Engine::new();
        let props = Props::new().with_must("a");

        let a = engine.compile(&["<p>", "</p>"], &props).unwrap();
        let b = engine.compile(&["<p>", "</p>"], &props).unwrap();
        let c = engine.compile(&["<div>", "</div>"], &props).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, template_key(&assemble(&["<p>", "</p>"], 1).unwrap(), props.shapes()));
    }

    #[test]
    fn test_colliding_keys_compile_separately() {
        let engine = Engine::new();
        assert_eq!(derive_key("<p>Aa</p>"), derive_key("<p>BB</p>"));

        let a = engine.render(&["<p>Aa</p>"], &Props::new()).unwrap();
        let b = engine.render(&["<p>BB</p>"], &Props::new()).unwrap();
        let again = engine.render(&["<p>Aa</p>"], &Props::new()).unwrap();

        assert_eq!(a.text(), Some("Aa"));
        assert_eq!(b.text(), Some("BB"));
        assert_eq!(again, a);
        assert_eq!(engine.compilations(), 2);
        assert_eq!(engine.cache().len(), 2);

        let error = engine
            .invoke(derive_key("<p>Aa</p>"), &Props::new())
            .unwrap_err();
        assert_eq!(error.reason(), AMBIGUOUS_KEY);
    }

    #[test]
    fn test_digit_after_value() {
        let element = Engine::new()
            .render(&["<p>", "0%</p>"], &Props::new().with_must(5))
            .unwrap();

        assert_eq!(element.text(), Some("50%"));
    }

    #[test]
    fn test_sigil_in_static_text() {
        let engine = Engine::new();
        let element = engine
            .render(&["<p>Price: $1</p>"], &Props::new())
            .unwrap();
        assert_eq!(element.text(), Some("Price: $1"));

        let element = engine
            .render(&["<p title=$2>costs $1, not ", "</p>"], &Props::new().with_must("free"))
            .unwrap();
        assert_eq!(element.attr("title"), Some("$2"));
        assert_eq!(element.text(), Some("costs $1, not free"));
    }

    #[test]
    fn test_live_token_position_is_part_of_identity() {
        let engine = Engine::new();
        let props = Props::new().with_must("x");

        let before = engine.render(&["<p>", "$1</p>"], &props).unwrap();
        let after = engine.render(&["<p>$1", "</p>"], &props).unwrap();

        assert_eq!(before.text(), Some("x$1"));
        assert_eq!(after.text(), Some("$1x"));
        assert_eq!(engine.compilations(), 2);
    }

    #[test]
    fn test_digit_after_first_of_many_values() {
        let mut fragments = vec!["<p>", "2"];
        fragments.extend([""; 10]);
        fragments.push("</p>");
        let mut values = vec![json!("a")];
        values.extend(vec![json!(""); 11]);

        let element = Engine::new().render(&fragments, &Props::from(values)).unwrap();

        assert_eq!(element.text(), Some("a2"));
    }

    #[test]
    fn test_shape_change_compiles_again() {
        let engine = Engine::new();
        let fragments = ["<ul>", "</ul>"];

        let text = engine.render(&fragments, &Props::new().with_must("none")).unwrap();
        let list = engine.render(&fragments, &Props::new().with_must(json!([]))).unwrap();

        assert_eq!(text.text(), Some("none"));
        assert!(matches!(list.children.nodes(), [Child::Splice(_)]));
        assert_eq!(engine.compilations(), 2);
    }

    #[test]
    fn test_error_not_cached() {
        let engine = Engine::new();
        let fragments = ["<p>", "</div>"];
        let props = Props::new().with_must("x");

        let error = engine.render(&fragments, &props).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Structure);
        assert_eq!(error.reason(), MISMATCHED_TAG);
        assert_eq!(
            error.name(),
            Some(
                template_key(&assemble(&fragments, 1).unwrap(), props.shapes())
                    .to_string()
                    .as_str()
            )
        );
        assert!(engine.cache().is_empty());

        // A second attempt parses again and fails the same way.
        assert_eq!(engine.render(&fragments, &props).unwrap_err(), error);
        assert_eq!(engine.compilations(), 0);
    }

    #[test]
    fn test_multiple_roots_rejected() {
        let error = Engine::new()
            .render(&["<p>a</p><p>b</p>"], &Props::new())
            .unwrap_err();

        assert_eq!(error.reason(), MULTIPLE_ROOTS);
    }

    #[test]
    fn test_too_many_values() {
        let props = Props::from(vec![json!(0); 15]);
        let fragments = vec![""; 16];
        let error = Engine::new().render(&fragments, &props).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Arity);
        assert_eq!(error.reason(), TOO_MANY_VALUES);
    }

    #[test]
    fn test_empty_template() {
        let engine = Engine::new();
        let error = engine.render(&[""], &Props::new()).unwrap_err();

        assert_eq!(error.reason(), crate::report::MISSING_ROOT);
        assert_eq!(error.name(), None);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_invoke_unknown_key() {
        let error = Engine::new()
            .invoke(derive_key("never compiled"), &Props::new())
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_nested_render_in_props() {
        let engine = Engine::new();
        let rows: Vec<Value> = ["a", "b"]
            .iter()
            .map(|label| {
                engine
                    .render(&["<li>", "</li>"], &Props::new().with_must(label))
                    .map(|element| element.to_value())
            })
            .collect::<Result<_, _>>()
            .unwrap();
        let list = engine
            .render(&["<ul class=rows>", "</ul>"], &Props::new().with_must(&rows))
            .unwrap();

        assert_eq!(
            list.to_value(),
            json!({
                "tag": "ul",
                "attrs": {"class": "rows"},
                "children": [{"children": [
                    {"tag": "li", "attrs": {}, "children": "a"},
                    {"tag": "li", "attrs": {}, "children": "b"}
                ]}]
            })
        );
    }

    #[derive(Default)]
    struct RecordingHost {
        sources: Mutex<Vec<String>>,
    }

    impl Host for Arc<RecordingHost> {
        fn install(&self, key: CacheKey, source: &str, plan: Plan) -> Result<Arc<dyn Producer>, Error> {
            self.sources.lock().unwrap().push(source.to_string());
            ClosureHost.install(key, source, plan)
        }
    }

    #[test]
    fn test_custom_host_receives_source() {
        let host = Arc::new(RecordingHost::default());
        let engine = Engine::new().with_host(Arc::clone(&host));

        engine
            .render(&["<p>", "</p>"], &Props::new().with_must("x"))
            .unwrap();
        engine
            .render(&["<p>", "</p>"], &Props::new().with_must("y"))
            .unwrap();

        let sources = host.sources.lock().unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].starts_with("function(props){\"use strict\";return {tag:\"p\""));
        assert!(sources[0].contains("children:\"\"+props.$1"));
    }
}
