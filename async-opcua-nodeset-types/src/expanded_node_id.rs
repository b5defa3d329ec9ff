// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `ExpandedNodeId`.

use std::{borrow::Cow, fmt, str::FromStr};

use crate::{
    node_id::{parse_node_id_parts, NodeId, NodeIdError},
    NamespaceTable,
};

/// A node ID that may name its namespace by URI instead of by index, and may live on
/// another server. This is the type of reference targets.
#[derive(PartialEq, Debug, Clone, Eq, Hash, Default)]
pub struct ExpandedNodeId {
    /// The inner node ID. If `namespace_uri` is set, the namespace index is ignored.
    pub node_id: NodeId,
    /// Namespace URI overriding the namespace index of `node_id`.
    pub namespace_uri: Option<String>,
    /// Index of the server this node lives on, 0 for the local server.
    pub server_index: u32,
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        ExpandedNodeId {
            node_id,
            namespace_uri: None,
            server_index: 0,
        }
    }
}

impl From<&NodeId> for ExpandedNodeId {
    fn from(value: &NodeId) -> Self {
        value.clone().into()
    }
}

impl From<(NodeId, &str)> for ExpandedNodeId {
    fn from((node_id, uri): (NodeId, &str)) -> Self {
        ExpandedNodeId {
            node_id,
            namespace_uri: Some(uri.to_owned()),
            server_index: 0,
        }
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        match &self.namespace_uri {
            None => write!(f, "{}", self.node_id),
            Some(uri) => {
                let uri = uri.replace('%', "%25").replace(';', "%3b");
                write!(f, "nsu={};{}", uri, self.node_id.identifier)
            }
        }
    }
}

impl FromStr for ExpandedNodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_node_id_parts(s)?;
        Ok(ExpandedNodeId {
            node_id: parts.node_id,
            namespace_uri: parts.namespace_uri,
            server_index: parts.server_index.unwrap_or(0),
        })
    }
}

impl ExpandedNodeId {
    /// Creates an expanded node id from a node id
    pub fn new<T>(value: T) -> ExpandedNodeId
    where
        T: Into<ExpandedNodeId>,
    {
        value.into()
    }

    /// Return `true` if this refers to a node on the local server.
    pub fn is_local(&self) -> bool {
        self.server_index == 0
    }

    /// Resolve a local expanded node ID into a node ID in `namespaces`, using the
    /// namespace URI if it is set.
    ///
    /// Returns `None` for nodes on other servers, and for namespace URIs that are
    /// not in `namespaces`.
    pub fn try_resolve<'a>(&'a self, namespaces: &NamespaceTable) -> Option<Cow<'a, NodeId>> {
        if !self.is_local() {
            return None;
        }
        match &self.namespace_uri {
            Some(uri) => {
                let idx = namespaces.get_index(uri)?;
                Some(Cow::Owned(self.node_id.with_namespace(idx)))
            }
            None => Some(Cow::Borrowed(&self.node_id)),
        }
    }
}
