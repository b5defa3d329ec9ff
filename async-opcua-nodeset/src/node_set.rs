//! The node set aggregate.

use hashbrown::HashMap;
use log::warn;
use opcua_nodeset_types::{NamespaceTable, NodeId};

use crate::{
    AliasTable, CombinedReferences, DataTypeDefinition, NodeAttributes, Reference, ReferenceMap,
};

/// A self contained address space model.
///
/// Every namespace index in nodes, references, aliases and data type definitions refers
/// to the namespace table of the same node set. Node sets are built by loading a document
/// or by merging two node sets with [`crate::UaNodeSetMerger`], which never modifies its
/// inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UaNodeSet {
    namespaces: NamespaceTable,
    aliases: AliasTable,
    nodes: HashMap<NodeId, NodeAttributes>,
    explicit_references: ReferenceMap,
    implicit_references: ReferenceMap,
    data_type_definitions: HashMap<NodeId, DataTypeDefinition>,
}

impl UaNodeSet {
    /// Create an empty node set using the given namespace table.
    pub fn new(namespaces: NamespaceTable) -> Self {
        Self {
            namespaces,
            ..Default::default()
        }
    }

    /// The namespace table every namespace index in this node set refers to.
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// The alias table.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// All nodes by node ID.
    pub fn nodes(&self) -> &HashMap<NodeId, NodeAttributes> {
        &self.nodes
    }

    /// Get a node by node ID.
    pub fn node(&self, node_id: &NodeId) -> Option<&NodeAttributes> {
        self.nodes.get(node_id)
    }

    /// References declared by the source document.
    pub fn explicit_references(&self) -> &ReferenceMap {
        &self.explicit_references
    }

    /// Converse references recorded alongside the explicit ones.
    pub fn implicit_references(&self) -> &ReferenceMap {
        &self.implicit_references
    }

    /// Union of explicit and implicit references, used for traversal.
    pub fn combined_references(&self) -> CombinedReferences<'_> {
        CombinedReferences::new(&self.explicit_references, &self.implicit_references)
    }

    /// All data type definitions by data type node ID.
    pub fn data_type_definitions(&self) -> &HashMap<NodeId, DataTypeDefinition> {
        &self.data_type_definitions
    }

    /// Get the definition of a data type.
    pub fn data_type_definition(&self, node_id: &NodeId) -> Option<&DataTypeDefinition> {
        self.data_type_definitions.get(node_id)
    }

    /// Insert a node, replacing and returning any node with the same node ID.
    pub fn insert_node(&mut self, node: NodeAttributes) -> Option<NodeAttributes> {
        self.nodes.insert(node.node_id.clone(), node)
    }

    /// Insert an alias, replacing any alias with the same token.
    pub fn insert_alias(&mut self, alias: impl Into<String>, node_id: NodeId) -> Option<NodeId> {
        self.aliases.insert(alias, node_id)
    }

    /// Append an explicit reference.
    pub fn insert_explicit_reference(&mut self, reference: Reference) {
        self.explicit_references.insert(reference);
    }

    /// Append an implicit reference.
    pub fn insert_implicit_reference(&mut self, reference: Reference) {
        self.implicit_references.insert(reference);
    }

    /// Append a reference declared by a document as an explicit reference, and record its
    /// converse as an implicit reference on the target if the target is a local node.
    pub fn add_reference(&mut self, reference: Reference) {
        if let Some(inverse) = reference.invert(&self.namespaces) {
            self.implicit_references.insert(inverse);
        }
        self.explicit_references.insert(reference);
    }

    /// Insert a data type definition, replacing and returning any previous definition.
    pub fn insert_data_type_definition(
        &mut self,
        node_id: NodeId,
        definition: DataTypeDefinition,
    ) -> Option<DataTypeDefinition> {
        self.data_type_definitions.insert(node_id, definition)
    }

    /// Find the node ID of a node by namespace URI and browse name, if it exists.
    pub fn find_by_browse_name(&self, namespace_uri: &str, name: &str) -> Option<&NodeId> {
        let ns = self.namespaces.get_index(namespace_uri)?;
        let mut found = self.nodes.values().filter(|n| {
            n.browse_name.namespace_index == ns && n.browse_name.name == name
        });
        let first = found.next()?;
        if found.next().is_some() {
            warn!("Multiple nodes with browse name {ns}:{name}, returning an arbitrary one");
        }
        Some(&first.node_id)
    }

    pub(crate) fn namespaces_mut(&mut self) -> &mut NamespaceTable {
        &mut self.namespaces
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut HashMap<NodeId, NodeAttributes> {
        &mut self.nodes
    }

    pub(crate) fn data_type_definitions_mut(&mut self) -> &mut HashMap<NodeId, DataTypeDefinition> {
        &mut self.data_type_definitions
    }
}
