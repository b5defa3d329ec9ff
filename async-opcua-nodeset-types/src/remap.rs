//! Moving identifiers from one namespace table into another.

use crate::{ExpandedNodeId, NamespaceMapper, NodeId, QualifiedName, RemapError};

/// Trait for values carrying namespace indices that can be rewritten to refer to
/// another namespace table.
///
/// Implementations only touch namespace-bearing fields, everything else is copied.
pub trait Remap: Sized {
    /// Return a copy of `self` with every namespace index translated through `mapper`.
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError>;
}

impl Remap for NodeId {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        Ok(self.with_namespace(mapper.get_index(self.namespace)?))
    }
}

impl Remap for QualifiedName {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        Ok(QualifiedName {
            namespace_index: mapper.get_index(self.namespace_index)?,
            name: self.name.clone(),
        })
    }
}

impl Remap for ExpandedNodeId {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        // Indices on a remote server refer to that server's namespace array.
        if self.server_index != 0 {
            return Ok(self.clone());
        }
        let node_id = match &self.namespace_uri {
            Some(uri) => self.node_id.with_namespace(mapper.resolve_uri(uri)?),
            None => self.node_id.remap(mapper)?,
        };
        Ok(ExpandedNodeId {
            node_id,
            namespace_uri: None,
            server_index: 0,
        })
    }
}

impl<T: Remap> Remap for Option<T> {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        self.as_ref().map(|v| v.remap(mapper)).transpose()
    }
}

impl<T: Remap> Remap for Vec<T> {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        self.iter().map(|v| v.remap(mapper)).collect()
    }
}
