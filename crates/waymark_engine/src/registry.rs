//! Named registry of node producers.
//!
//! Read-only after construction; share across sessions via `Arc`.

use std::collections::HashMap;

use waymark_foundation::{Error, Result};

use crate::node::NodeProducer;

/// Maps node names to their producers.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, NodeProducer>,
}

impl NodeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a producer under `name`.
    ///
    /// # Errors
    /// Returns [`ErrorKind::ReservedNodeName`](waymark_foundation::ErrorKind::ReservedNodeName)
    /// for underscore-prefixed names (reserved for private helper logic)
    /// and [`ErrorKind::DuplicateNode`](waymark_foundation::ErrorKind::DuplicateNode)
    /// if the name is already taken.
    pub fn register(&mut self, name: impl Into<String>, producer: NodeProducer) -> Result<()> {
        let name = name.into();
        if name.starts_with('_') {
            return Err(Error::reserved_name(name));
        }
        if self.nodes.contains_key(&name) {
            return Err(Error::duplicate_node(name, 0));
        }
        self.nodes.insert(name, producer);
        Ok(())
    }

    /// Builds a registry from a flat name/producer mapping, skipping
    /// underscore-prefixed entries.
    ///
    /// This is the bulk-loading form: private helpers can live in the same
    /// collection as the nodes and are filtered out here.
    #[must_use]
    pub fn from_producers<S, I>(producers: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, NodeProducer)>,
    {
        let nodes = producers
            .into_iter()
            .map(|(name, producer)| (name.into(), producer))
            .filter(|(name, _)| !name.starts_with('_'))
            .collect();
        Self { nodes }
    }

    /// Looks up a producer by name.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnknownNode`](waymark_foundation::ErrorKind::UnknownNode)
    /// when the name is absent.
    pub fn resolve(&self, name: &str) -> Result<&NodeProducer> {
        self.nodes
            .get(name)
            .ok_or_else(|| Error::unknown_node(name))
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Returns the number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over registered node names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("NodeRegistry").field("nodes", &names).finish()
    }
}
