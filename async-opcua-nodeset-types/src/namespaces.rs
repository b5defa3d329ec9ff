// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Utilities for working with namespaces.

use hashbrown::HashMap;
use log::debug;

use crate::errors::RemapError;

/// URI of the base OPC UA namespace, which always has index 0.
pub const OPC_UA_NAMESPACE: &str = "http://opcfoundation.org/UA/";

/// Ordered table of namespace URIs, mapping each URI to a stable index.
///
/// Index 0 is always [`OPC_UA_NAMESPACE`]. URIs are compared by exact string equality,
/// and each URI appears at most once.
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    uris: Vec<String>,
    known_namespaces: HashMap<String, u16>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for NamespaceTable {
    fn eq(&self, other: &Self) -> bool {
        self.uris == other.uris
    }
}

impl Eq for NamespaceTable {}

fn is_valid_uri(uri: &str) -> bool {
    !uri.is_empty() && !uri.chars().any(|c| c.is_whitespace() || c.is_control())
}

impl NamespaceTable {
    /// Create a new namespace table containing only the base namespace.
    pub fn new() -> Self {
        let mut known_namespaces = HashMap::new();
        known_namespaces.insert(OPC_UA_NAMESPACE.to_owned(), 0u16);

        Self {
            uris: vec![OPC_UA_NAMESPACE.to_owned()],
            known_namespaces,
        }
    }

    /// Create a new namespace table with the given URIs appended after the base namespace,
    /// in order.
    pub fn new_full<'a>(uris: impl IntoIterator<Item = &'a str>) -> Result<Self, RemapError> {
        let mut table = Self::new();
        for uri in uris {
            table.add_namespace(uri)?;
        }
        Ok(table)
    }

    /// Add a new namespace, returning its index in the namespace table.
    /// If the namespace is already added, its old index is returned.
    pub fn add_namespace(&mut self, namespace: &str) -> Result<u16, RemapError> {
        if let Some(ns) = self.known_namespaces.get(namespace) {
            return Ok(*ns);
        }
        if !is_valid_uri(namespace) {
            return Err(RemapError::UnresolvableNamespaceUri(namespace.to_owned()));
        }
        let Ok(index) = u16::try_from(self.uris.len()) else {
            return Err(RemapError::UnresolvableNamespaceUri(namespace.to_owned()));
        };
        self.uris.push(namespace.to_owned());
        self.known_namespaces.insert(namespace.to_owned(), index);

        Ok(index)
    }

    /// Get the index of the given namespace.
    pub fn get_index(&self, ns: &str) -> Option<u16> {
        self.known_namespaces.get(ns).copied()
    }

    /// Get the namespace URI at the given index.
    pub fn get_uri(&self, index: u16) -> Option<&str> {
        self.uris.get(index as usize).map(|u| u.as_str())
    }

    /// Number of namespaces in the table, including the base namespace.
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Iterate over the namespace URIs in index order.
    pub fn uris(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.uris.iter().map(|u| u.as_str())
    }

    /// Register a list of namespaces given in the order of some foreign table,
    /// where the first URI has foreign index 1.
    ///
    /// Returns the substitution from foreign indices to indices in this table.
    pub fn register_uris<'a>(
        &mut self,
        uris: impl IntoIterator<Item = &'a str>,
    ) -> Result<NamespaceSubstitution, RemapError> {
        let mut index_map = vec![0u16];
        for uri in uris {
            index_map.push(self.add_namespace(uri)?);
        }
        Ok(NamespaceSubstitution { index_map })
    }

    /// Register every namespace of `other` in this table, returning the substitution
    /// from indices in `other` to indices in `self`.
    pub fn register_all(
        &mut self,
        other: &NamespaceTable,
    ) -> Result<NamespaceSubstitution, RemapError> {
        self.register_uris(other.uris().skip(1))
    }

    /// Build the unified namespace table of two tables.
    ///
    /// The namespaces of `a` are registered before those of `b`, so the result is
    /// deterministic, and unifying a table with itself yields the same table and two
    /// identity substitutions.
    pub fn unify(
        a: &NamespaceTable,
        b: &NamespaceTable,
    ) -> Result<(NamespaceTable, NamespaceSubstitution, NamespaceSubstitution), RemapError> {
        let mut unified = NamespaceTable::new();
        let sub_a = unified.register_all(a)?;
        let sub_b = unified.register_all(b)?;
        debug!(
            "Unified namespace tables with {} and {} entries into {} entries",
            a.len(),
            b.len(),
            unified.len()
        );
        Ok((unified, sub_a, sub_b))
    }
}

/// Total mapping from the namespace indices of one table to the indices of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSubstitution {
    index_map: Vec<u16>,
}

impl NamespaceSubstitution {
    /// Create the identity substitution for a table with `len` namespaces. A table holds
    /// at most `u16::MAX + 1` namespaces, so larger values of `len` are clamped.
    pub fn identity(len: usize) -> Self {
        Self {
            index_map: (0..=u16::MAX).take(len).collect(),
        }
    }

    /// Get the target index of the given source index.
    pub fn get_index(&self, index: u16) -> Result<u16, RemapError> {
        self.index_map
            .get(index as usize)
            .copied()
            .ok_or(RemapError::OutOfRangeNamespaceIndex {
                index,
                namespace_count: self.index_map.len(),
            })
    }

    /// Return `true` if every index maps to itself.
    pub fn is_identity(&self) -> bool {
        self.index_map
            .iter()
            .enumerate()
            .all(|(i, idx)| i == *idx as usize)
    }

    /// Return the inner index map, indexed by source namespace index.
    pub fn index_map(&self) -> &[u16] {
        &self.index_map
    }
}

/// Utility handling namespaces when moving identifiers from one table into another.
///
/// Namespace indices are translated through a fixed [`NamespaceSubstitution`], while
/// namespace URIs are resolved against, and if necessary registered in, the target table.
pub struct NamespaceMapper<'a> {
    namespaces: &'a mut NamespaceTable,
    substitution: &'a NamespaceSubstitution,
}

impl<'a> NamespaceMapper<'a> {
    /// Create a new namespace mapper targeting `namespaces`.
    pub fn new(namespaces: &'a mut NamespaceTable, substitution: &'a NamespaceSubstitution) -> Self {
        Self {
            namespaces,
            substitution,
        }
    }

    /// Get the index in the target table of a namespace given its source index.
    pub fn get_index(&self, index: u16) -> Result<u16, RemapError> {
        self.substitution.get_index(index)
    }

    /// Get the index of a namespace URI in the target table, registering it if it is new.
    pub fn resolve_uri(&mut self, uri: &str) -> Result<u16, RemapError> {
        let len = self.namespaces.len();
        let idx = self.namespaces.add_namespace(uri)?;
        if self.namespaces.len() > len {
            debug!("Registered namespace {uri} at index {idx} while resolving a namespace URI");
        }
        Ok(idx)
    }

    /// Return the target namespace table.
    pub fn namespaces(&self) -> &NamespaceTable {
        &*self.namespaces
    }

    /// Return the substitution used for namespace indices.
    pub fn substitution(&self) -> &NamespaceSubstitution {
        self.substitution
    }
}
