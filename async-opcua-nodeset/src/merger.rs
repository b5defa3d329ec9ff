//! Merging of node sets.

use std::fmt::Display;

use hashbrown::{hash_map::Entry, HashMap};
use log::{debug, trace, warn};
use opcua_nodeset_types::{NamespaceMapper, NamespaceTable, NodeId, Remap, RemapError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UaNodeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// What to do when both node sets define a node or data type definition with the same
/// node ID after remapping, but with different contents. Identical definitions are
/// always collapsed into one.
pub enum CollisionPolicy {
    #[default]
    /// Keep the definition from the second node set, logging a warning.
    LastWriteWins,
    /// Keep the definition from the first node set.
    KeepFirst,
    /// Fail the merge.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Options for [`UaNodeSetMerger`].
pub struct MergeOptions {
    /// Policy for conflicting nodes and data type definitions.
    pub collision_policy: CollisionPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One of the two node sets given to a merge.
pub enum Operand {
    /// The first node set, whose namespaces are registered first.
    First,
    /// The second node set.
    Second,
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::First => write!(f, "first"),
            Operand::Second => write!(f, "second"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Cause of a failed merge.
pub enum MergeErrorKind {
    /// An identifier could not be moved into the unified namespace table.
    #[error("{0}")]
    Remap(#[from] RemapError),
    /// Both node sets define the node differently, and the policy is to reject.
    #[error("Node {0} is defined differently in both node sets")]
    ConflictingNode(NodeId),
    /// Both node sets define the data type differently, and the policy is to reject.
    #[error("Data type {0} has different definitions in both node sets")]
    ConflictingDataTypeDefinition(NodeId),
}

#[derive(Error, Debug, Clone)]
#[error("Failed to merge node sets: {kind}, while remapping {identifier} from the {operand} node set")]
/// Error returned when a merge fails. No partial result is produced.
pub struct MergeError {
    #[source]
    /// The cause of the error.
    pub kind: Box<MergeErrorKind>,
    /// The identifier, alias or table being processed.
    pub identifier: String,
    /// The node set the identifier came from.
    pub operand: Operand,
}

impl MergeError {
    /// Create a new merge error.
    pub fn new(kind: MergeErrorKind, identifier: impl Into<String>, operand: Operand) -> Self {
        Self {
            kind: Box::new(kind),
            identifier: identifier.into(),
            operand,
        }
    }
}

trait ResultExt<T> {
    fn while_remapping(self, identifier: impl Display, operand: Operand) -> Result<T, MergeError>;
}

impl<T, E: Into<MergeErrorKind>> ResultExt<T> for Result<T, E> {
    fn while_remapping(self, identifier: impl Display, operand: Operand) -> Result<T, MergeError> {
        self.map_err(|e| MergeError::new(e.into(), identifier.to_string(), operand))
    }
}

/// Stateless merger of node sets.
pub struct UaNodeSetMerger;

impl UaNodeSetMerger {
    /// Merge two node sets using default options.
    ///
    /// The namespaces of `first` are registered in the result before those of `second`,
    /// and on conflicting definitions the definition from `second` wins.
    pub fn merge(first: &UaNodeSet, second: &UaNodeSet) -> Result<UaNodeSet, MergeError> {
        Self::merge_with_options(first, second, &MergeOptions::default())
    }

    /// Merge two node sets into a new node set.
    ///
    /// Every node, reference, alias and data type definition of both inputs is copied
    /// into the result with namespace indices rewritten into the unified namespace table.
    /// References are appended without deduplication.
    pub fn merge_with_options(
        first: &UaNodeSet,
        second: &UaNodeSet,
        options: &MergeOptions,
    ) -> Result<UaNodeSet, MergeError> {
        let mut namespaces = NamespaceTable::new();
        let first_sub = namespaces
            .register_all(first.namespaces())
            .while_remapping("namespace table", Operand::First)?;
        let second_sub = namespaces
            .register_all(second.namespaces())
            .while_remapping("namespace table", Operand::Second)?;
        debug!(
            "Merging node sets with {} and {} nodes into {} namespaces",
            first.nodes().len(),
            second.nodes().len(),
            namespaces.len()
        );

        let mut result = UaNodeSet::default();
        for (input, sub, operand) in [
            (first, &first_sub, Operand::First),
            (second, &second_sub, Operand::Second),
        ] {
            let mut mapper = NamespaceMapper::new(&mut namespaces, sub);
            Self::merge_into(&mut result, input, &mut mapper, operand, options)?;
        }
        *result.namespaces_mut() = namespaces;

        debug!(
            "Merged node set has {} nodes, {} explicit and {} implicit references",
            result.nodes().len(),
            result.explicit_references().len(),
            result.implicit_references().len()
        );
        Ok(result)
    }

    /// Merge a sequence of node sets from left to right, so that
    /// `merge_all([a, b, c])` is `merge(merge(a, b), c)`.
    ///
    /// Merging an empty sequence gives an empty node set. A single node set is merged
    /// with an empty one, so it is remapped and checked like any other operand.
    pub fn merge_all<'a>(
        node_sets: impl IntoIterator<Item = &'a UaNodeSet>,
        options: &MergeOptions,
    ) -> Result<UaNodeSet, MergeError> {
        let mut iter = node_sets.into_iter();
        let Some(first) = iter.next() else {
            return Ok(UaNodeSet::default());
        };
        let Some(second) = iter.next() else {
            return Self::merge_with_options(first, &UaNodeSet::default(), options);
        };
        let mut result = Self::merge_with_options(first, second, options)?;
        for next in iter {
            result = Self::merge_with_options(&result, next, options)?;
        }
        Ok(result)
    }

    fn merge_into(
        result: &mut UaNodeSet,
        input: &UaNodeSet,
        mapper: &mut NamespaceMapper<'_>,
        operand: Operand,
        options: &MergeOptions,
    ) -> Result<(), MergeError> {
        trace!(
            "Remapping {} node set with substitution {:?}",
            operand,
            mapper.substitution().index_map()
        );
        for (id, node) in input.nodes() {
            let node = node.remap(mapper).while_remapping(id, operand)?;
            let key = node.node_id.clone();
            insert_with_policy(result.nodes_mut(), key, node, options.collision_policy, "Node")
                .map_err(MergeErrorKind::ConflictingNode)
                .while_remapping(id, operand)?;
        }

        for reference in input.explicit_references().iter() {
            let reference = reference
                .remap(mapper)
                .while_remapping(&reference.source_node_id, operand)?;
            result.insert_explicit_reference(reference);
        }
        for reference in input.implicit_references().iter() {
            let reference = reference
                .remap(mapper)
                .while_remapping(&reference.source_node_id, operand)?;
            result.insert_implicit_reference(reference);
        }

        for (alias, target) in input.aliases().iter() {
            let target = target
                .remap(mapper)
                .while_remapping(format!("alias {alias}"), operand)?;
            if let Some(old) = result.insert_alias(alias, target.clone()) {
                if old != target {
                    debug!("Alias {alias} changed from {old} to {target}");
                }
            }
        }

        for (id, definition) in input.data_type_definitions() {
            let key = id.remap(mapper).while_remapping(id, operand)?;
            let definition = definition.remap(mapper).while_remapping(id, operand)?;
            insert_with_policy(
                result.data_type_definitions_mut(),
                key,
                definition,
                options.collision_policy,
                "Data type definition",
            )
            .map_err(MergeErrorKind::ConflictingDataTypeDefinition)
            .while_remapping(id, operand)?;
        }
        Ok(())
    }
}

/// Insert `value` under `key`, resolving a collision with differing content according to
/// `policy`. Returns the key on rejected collisions.
fn insert_with_policy<V: PartialEq>(
    map: &mut HashMap<NodeId, V>,
    key: NodeId,
    value: V,
    policy: CollisionPolicy,
    what: &str,
) -> Result<(), NodeId> {
    match map.entry(key) {
        Entry::Vacant(e) => {
            e.insert(value);
        }
        Entry::Occupied(mut e) => {
            if e.get() == &value {
                return Ok(());
            }
            match policy {
                CollisionPolicy::LastWriteWins => {
                    warn!(
                        "{what} {} is defined differently in both node sets, keeping the last definition",
                        e.key()
                    );
                    e.insert(value);
                }
                CollisionPolicy::KeepFirst => {
                    debug!(
                        "{what} {} is defined differently in both node sets, keeping the first definition",
                        e.key()
                    );
                }
                CollisionPolicy::Reject => return Err(e.key().clone()),
            }
        }
    }
    Ok(())
}
