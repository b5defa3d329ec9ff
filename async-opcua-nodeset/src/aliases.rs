//! Alias table of a node set.

use hashbrown::HashMap;
use opcua_nodeset_types::NodeId;

/// Mapping from alias tokens to the node IDs they abbreviate, typically reference types
/// and data types. Several aliases may map to the same node ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, NodeId>,
}

impl AliasTable {
    /// Create an empty alias table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an alias, returning the node ID it previously mapped to.
    pub fn insert(&mut self, alias: impl Into<String>, node_id: NodeId) -> Option<NodeId> {
        self.aliases.insert(alias.into(), node_id)
    }

    /// Get the node ID an alias stands for.
    pub fn get(&self, alias: &str) -> Option<&NodeId> {
        self.aliases.get(alias)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Return `true` if the table has no aliases.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterate over `(alias, node_id)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeId)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, NodeId)> for AliasTable {
    fn from_iter<T: IntoIterator<Item = (S, NodeId)>>(iter: T) -> Self {
        Self {
            aliases: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
