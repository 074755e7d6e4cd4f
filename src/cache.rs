use crate::{
    compile::CacheKey,
    element::Element,
    produce::Producer,
    props::Props,
    report::{error_ambiguous_key, error_missing_producer, Error},
};
use std::{
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A producer and the template identity it was compiled from.
struct Entry {
    identity: String,
    producer: Arc<dyn Producer>,
}

type Producers = HashMap<CacheKey, Vec<Entry>>;

/// Maps a [`CacheKey`] to the [`Producer`]s compiled under it.
///
/// Keys are 32-bit hashes, so distinct templates can share one. Every
/// producer is stored with its full identity text (see
/// [`template_identity`][`crate::compile::template_identity`]) and is only
/// returned for an equal identity.
///
/// Entries are never evicted. A [`ProducerCache`] may be shared across
/// threads; two threads that compile the same template both `put`, and the
/// last one wins.
#[derive(Default)]
pub struct ProducerCache {
    producers: RwLock<Producers>,
}

impl ProducerCache {
    /// Create a new, empty [`ProducerCache`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the [`Producer`] stored under the key for the given identity.
    pub fn get(&self, key: CacheKey, identity: &str) -> Option<Arc<dyn Producer>> {
        self.read()
            .get(&key)?
            .iter()
            .find(|entry| entry.identity == identity)
            .map(|entry| Arc::clone(&entry.producer))
    }

    /// Store a [`Producer`] under the key, replacing any previous one with
    /// the same identity.
    pub fn put<I>(&self, key: CacheKey, identity: I, producer: Arc<dyn Producer>)
    where
        I: Into<String>,
    {
        let identity = identity.into();
        let mut producers = self.write();
        let entries = producers.entry(key).or_default();

        match entries.iter_mut().find(|entry| entry.identity == identity) {
            Some(entry) => entry.producer = producer,
            None => entries.push(Entry { identity, producer }),
        }
    }

    /// Invoke the [`Producer`] stored under the key.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when no producer is stored under the key, when
    /// producers of several templates share the key, or when the producer
    /// itself fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil::{cache::ProducerCache, compile::CacheKey, Element, Error, Props};
    /// use std::sync::Arc;
    ///
    /// let cache = ProducerCache::new();
    /// cache.put(CacheKey::Hash(1), "<hr>", Arc::new(|_: &Props| Ok::<_, Error>(Element::new("hr"))));
    ///
    /// assert!(cache.invoke(CacheKey::Hash(1), &Props::new()).is_ok());
    /// assert!(cache.invoke(CacheKey::Hash(2), &Props::new()).is_err());
    /// ```
    pub fn invoke(&self, key: CacheKey, props: &Props) -> Result<Element, Error> {
        // The lock is released before producing, so producers may render
        // nested templates through the same cache.
        let producer = {
            let producers = self.read();
            match producers.get(&key).map(Vec::as_slice) {
                Some([entry]) => Arc::clone(&entry.producer),
                Some(entries) if entries.len() > 1 => {
                    return Err(error_ambiguous_key(key, entries.len()))
                }
                _ => return Err(error_missing_producer(key)),
            }
        };

        producer.produce(props)
    }

    /// Return true if any [`Producer`] is stored under the key.
    #[inline]
    pub fn contains(&self, key: CacheKey) -> bool {
        self.read().get(&key).is_some_and(|entries| !entries.is_empty())
    }

    /// Number of stored producers.
    #[inline]
    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half written, so a
    // poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Producers> {
        self.producers
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Producers> {
        self.producers
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Debug for ProducerCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.read().keys().copied().collect();
        keys.sort_by_key(|key| match key {
            CacheKey::Empty => None,
            CacheKey::Hash(hash) => Some(*hash),
        });

        f.debug_struct("ProducerCache")
            .field("keys", &keys)
            .field("len", &self.len())
            .finish()
    }
}
