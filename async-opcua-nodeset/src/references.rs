//! Typed edges between nodes, and the multimap they are stored in.

use hashbrown::HashMap;
use opcua_nodeset_types::{
    ExpandedNodeId, NamespaceMapper, NamespaceTable, NodeId, Remap, RemapError,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Direction of a reference in the address space.
pub enum ReferenceDirection {
    /// Reference from the source node to the target.
    Forward,
    /// Reference from the target node to the source.
    Inverse,
}

impl ReferenceDirection {
    /// Return `true` if this is the forward direction.
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Get the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }
}

impl From<bool> for ReferenceDirection {
    fn from(is_forward: bool) -> Self {
        if is_forward {
            Self::Forward
        } else {
            Self::Inverse
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A typed reference from a node in a node set to some other node.
pub struct Reference {
    /// The node holding the reference.
    pub source_node_id: NodeId,
    /// The reference type.
    pub reference_type_id: NodeId,
    /// The node on the other end, which may live in another namespace or server.
    pub target_node_id: ExpandedNodeId,
    /// Direction, seen from the source node.
    pub direction: ReferenceDirection,
}

impl Reference {
    /// Create a new reference.
    pub fn new(
        source_node_id: impl Into<NodeId>,
        reference_type_id: impl Into<NodeId>,
        target_node_id: impl Into<ExpandedNodeId>,
        direction: ReferenceDirection,
    ) -> Self {
        Self {
            source_node_id: source_node_id.into(),
            reference_type_id: reference_type_id.into(),
            target_node_id: target_node_id.into(),
            direction,
        }
    }

    /// Return `true` if this is a forward reference.
    pub fn is_forward(&self) -> bool {
        self.direction.is_forward()
    }

    /// Get the converse of this reference, with the endpoints swapped and the direction
    /// reversed. Returns `None` if the target cannot be resolved to a local node ID in
    /// `namespaces`.
    pub fn invert(&self, namespaces: &NamespaceTable) -> Option<Reference> {
        let target = self.target_node_id.try_resolve(namespaces)?;
        Some(Reference {
            source_node_id: target.into_owned(),
            reference_type_id: self.reference_type_id.clone(),
            target_node_id: ExpandedNodeId::new(&self.source_node_id),
            direction: self.direction.reverse(),
        })
    }
}

impl Remap for Reference {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        Ok(Self {
            source_node_id: self.source_node_id.remap(mapper)?,
            reference_type_id: self.reference_type_id.remap(mapper)?,
            target_node_id: self.target_node_id.remap(mapper)?,
            direction: self.direction,
        })
    }
}

/// Multimap of references keyed by source node.
///
/// Duplicate references are kept as distinct entries, and references are kept in
/// insertion order, both per source node and across source nodes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    /// Source nodes in the order they were first inserted.
    sources: Vec<NodeId>,
    by_source: HashMap<NodeId, Vec<Reference>>,
    len: usize,
}

impl PartialEq for ReferenceMap {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.by_source == other.by_source
    }
}

impl ReferenceMap {
    /// Create an empty reference map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reference under its source node.
    pub fn insert(&mut self, reference: Reference) {
        let refs = match self.by_source.get_mut(&reference.source_node_id) {
            Some(r) => r,
            None => {
                self.sources.push(reference.source_node_id.clone());
                self.by_source
                    .entry(reference.source_node_id.clone())
                    .or_default()
            }
        };
        refs.push(reference);
        self.len += 1;
    }

    /// Get the references of a node.
    pub fn get(&self, source: &NodeId) -> &[Reference] {
        self.by_source
            .get(source)
            .map(|r| r.as_slice())
            .unwrap_or_default()
    }

    /// Iterate over the source nodes with at least one reference.
    pub fn sources(&self) -> impl Iterator<Item = &NodeId> {
        self.sources.iter()
    }

    /// Iterate over all references, grouped by source node.
    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.sources
            .iter()
            .flat_map(move |s| self.by_source.get(s).into_iter().flatten())
    }

    /// Total number of references, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the map has no references.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Extend<Reference> for ReferenceMap {
    fn extend<T: IntoIterator<Item = Reference>>(&mut self, iter: T) {
        for reference in iter {
            self.insert(reference);
        }
    }
}

impl FromIterator<Reference> for ReferenceMap {
    fn from_iter<T: IntoIterator<Item = Reference>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[derive(Debug, Clone, Copy)]
/// Borrowed union of the explicit and implicit references of a node set.
pub struct CombinedReferences<'a> {
    explicit: &'a ReferenceMap,
    implicit: &'a ReferenceMap,
}

impl<'a> CombinedReferences<'a> {
    pub(crate) fn new(explicit: &'a ReferenceMap, implicit: &'a ReferenceMap) -> Self {
        Self { explicit, implicit }
    }

    /// Get every reference of a node, explicit ones first.
    pub fn get(&self, source: &NodeId) -> impl Iterator<Item = &'a Reference> {
        self.explicit
            .get(source)
            .iter()
            .chain(self.implicit.get(source).iter())
    }

    /// Iterate over all references, explicit ones first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Reference> {
        self.explicit.iter().chain(self.implicit.iter())
    }

    /// Total number of references.
    pub fn len(&self) -> usize {
        self.explicit.len() + self.implicit.len()
    }

    /// Return `true` if there are no references.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
