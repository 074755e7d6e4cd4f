use super::{pipe::resolve, Producer};
use crate::{
    compile::{CacheKey, ChildPlan, DynamicPlan, EntryPlan, Plan},
    element::{Child, Children, Element, Splice},
    props::Props,
    report::{error_expected_list, error_missing_property, Error},
};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Turns a compiled program into an invocable [`Producer`].
///
/// `source` is the text form of `plan`. Hosts that compile text may use it,
/// [`ClosureHost`] only logs it.
pub trait Host: Send + Sync {
    /// Install the program compiled under `key`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the program cannot be installed. Nothing is
    /// cached in that case.
    fn install(&self, key: CacheKey, source: &str, plan: Plan) -> Result<Arc<dyn Producer>, Error>;
}

/// The default [`Host`], which composes boxed closures from a [`Plan`].
///
/// Static subtrees are cloned, everything else is resolved against the
/// [`Props`] of the invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClosureHost;

impl Host for ClosureHost {
    fn install(&self, key: CacheKey, source: &str, plan: Plan) -> Result<Arc<dyn Producer>, Error> {
        log::trace!("installing producer `{key}`:\n{source}");

        let producer: Arc<dyn Producer> = Arc::new(compose(plan));

        Ok(producer)
    }
}

type Thunk<T> = Box<dyn Fn(&Props) -> Result<T, Error> + Send + Sync>;

fn compose(plan: Plan) -> Thunk<Element> {
    match plan {
        Plan::Static(element) => Box::new(move |_: &Props| Ok(element.clone())),
        Plan::Dynamic(plan) => compose_dynamic(plan),
    }
}

fn compose_dynamic(plan: DynamicPlan) -> Thunk<Element> {
    let DynamicPlan {
        tag,
        key,
        attrs,
        children,
    } = plan;
    let children = compose_children(children);

    Box::new(move |props: &Props| {
        let key = key.as_ref().map(|key| resolve(key, props)).transpose()?;
        let attrs = attrs
            .iter()
            .map(|(name, value)| resolve(value, props).map(|value| (name.clone(), value)))
            .collect::<Result<IndexMap<_, _>, _>>()?;

        Ok(Element {
            tag: tag.clone(),
            key,
            attrs,
            children: children(props)?,
        })
    })
}

fn compose_children(plan: ChildPlan) -> Thunk<Children> {
    match plan {
        ChildPlan::Text(text) => Box::new(move |props: &Props| resolve(&text, props).map(Children::Text)),
        ChildPlan::Nodes(entries) => {
            let entries: Vec<_> = entries.into_iter().map(compose_entry).collect();

            Box::new(move |props: &Props| {
                entries
                    .iter()
                    .map(|entry| entry(props))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Children::Nodes)
            })
        }
    }
}

fn compose_entry(entry: EntryPlan) -> Thunk<Child> {
    match entry {
        EntryPlan::Node(plan) => {
            let thunk = compose(plan);
            Box::new(move |props: &Props| thunk(props).map(Child::Element))
        }
        EntryPlan::Splice(placeholder) => Box::new(move |props: &Props| match props.get(placeholder) {
            Some(Value::Array(items)) => Ok(Child::Splice(Splice {
                placeholder,
                items: items.clone(),
            })),
            Some(_) => Err(error_expected_list(placeholder)),
            None => Err(error_missing_property(placeholder, props.len())),
        }),
    }
}
