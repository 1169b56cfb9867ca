//! The context map threaded between menu nodes.
//!
//! A thin wrapper around the `im` crate's persistent hash map. Contexts are
//! cloned on every transition and re-run, so structural sharing keeps that
//! O(1) instead of a deep copy per input event.

use std::fmt;
use std::sync::Arc;

use crate::config::MergeMode;
use crate::value::Value;

/// Persistent key/value payload passed between nodes and goto-callables.
///
/// Cloning is O(1). Modifications return a new context sharing structure
/// with the original.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Context(im::HashMap<Arc<str>, Value>);

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self(im::HashMap::new())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the context has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Gets a string value by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Gets an integer value by key.
    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    /// Returns a new context with the entry inserted.
    #[must_use]
    pub fn insert(&self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        let mut new = self.0.clone();
        new.insert(key.into(), value.into());
        Self(new)
    }

    /// Returns a new context with the key removed.
    #[must_use]
    pub fn remove(&self, key: &str) -> Self {
        let mut new = self.0.clone();
        new.remove(key);
        Self(new)
    }

    /// Combines this context with an incoming one according to `mode`.
    ///
    /// With [`MergeMode::Replace`] the incoming context wins wholesale.
    /// With [`MergeMode::Union`] incoming entries are layered over this
    /// context, incoming values winning on key collision.
    #[must_use]
    pub fn merged(&self, incoming: &Self, mode: MergeMode) -> Self {
        match mode {
            MergeMode::Replace => incoming.clone(),
            MergeMode::Union => {
                let mut new = self.0.clone();
                for (key, value) in &incoming.0 {
                    new.insert(key.clone(), value.clone());
                }
                Self(new)
            }
        }
    }

    /// Iterates over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v))
    }
}

impl fmt::Debug for Context {
    /// Entries are printed sorted by key so output is deterministic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map()
            .entries(entries.iter().map(|(k, v)| (k.as_ref(), v)))
            .finish()
    }
}

impl FromIterator<(Arc<str>, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (Arc<str>, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (&'a str, Value)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (Arc::from(k), v))
                .collect(),
        )
    }
}
