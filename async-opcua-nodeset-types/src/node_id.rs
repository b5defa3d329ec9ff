// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `NodeId`, and the parser shared with `ExpandedNodeId`.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::{byte_string::ByteString, guid::Guid};

/// The identifier part of a node ID. Two node IDs with identifiers of different kinds
/// are never equal, even if their text is the same.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub enum Identifier {
    /// Numeric identifier, `i=123`.
    Numeric(u32),
    /// String identifier, `s=...`.
    String(String),
    /// GUID identifier, `g=...`.
    Guid(Guid),
    /// Opaque identifier, `b=<base64>`.
    ByteString(ByteString),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={v}"),
            Identifier::String(v) => write!(f, "s={v}"),
            Identifier::Guid(v) => write!(f, "g={v}"),
            Identifier::ByteString(v) => write!(f, "b={}", v.as_base64()),
        }
    }
}

impl Identifier {
    fn parse(s: &str) -> Option<Self> {
        let (kind, value) = s.split_once('=')?;
        Some(match kind {
            "i" => Identifier::Numeric(value.parse().ok()?),
            "s" => Identifier::String(value.to_owned()),
            "g" => Identifier::Guid(value.parse().ok()?),
            "b" => Identifier::ByteString(ByteString::from_base64(value)?),
            _ => return None,
        })
    }
}

impl From<u32> for Identifier {
    fn from(v: u32) -> Self {
        Identifier::Numeric(v)
    }
}

impl<'a> From<&'a str> for Identifier {
    fn from(v: &'a str) -> Self {
        Identifier::String(v.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Identifier::String(v)
    }
}

impl From<Guid> for Identifier {
    fn from(v: Guid) -> Self {
        Identifier::Guid(v)
    }
}

impl From<ByteString> for Identifier {
    fn from(v: ByteString) -> Self {
        Identifier::ByteString(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid node ID: {0}")]
/// Error returned when a node ID cannot be parsed from its string form.
pub struct NodeIdError(pub String);

/// The parts of a node ID in the text form of part 6, 5.3.1.11:
/// `[svr=<serverindex>;](ns=<namespaceindex>;|nsu=<uri>;)<type>=<value>`.
pub(crate) struct NodeIdParts {
    pub server_index: Option<u32>,
    pub namespace_uri: Option<String>,
    pub node_id: NodeId,
}

pub(crate) fn parse_node_id_parts(s: &str) -> Result<NodeIdParts, NodeIdError> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(svr=(?P<svr>[0-9]+);)?(ns=(?P<ns>[0-9]+);|nsu=(?P<nsu>[^;]+);)?(?P<t>[isgb]=.+)$")
            .unwrap()
    });

    let err = || NodeIdError(s.to_owned());
    let captures = RE.captures(s.trim()).ok_or_else(err)?;

    let server_index = captures
        .name("svr")
        .map(|svr| svr.as_str().parse::<u32>())
        .transpose()
        .map_err(|_| err())?;
    let namespace = captures
        .name("ns")
        .map(|ns| ns.as_str().parse::<u16>())
        .transpose()
        .map_err(|_| err())?
        .unwrap_or(0);
    // `%` and `;` are escaped inside namespace URIs.
    let namespace_uri = captures
        .name("nsu")
        .map(|nsu| nsu.as_str().replace("%3b", ";").replace("%25", "%"));
    let identifier = captures
        .name("t")
        .and_then(|t| Identifier::parse(t.as_str()))
        .ok_or_else(err)?;

    Ok(NodeIdParts {
        server_index,
        namespace_uri,
        node_id: NodeId {
            namespace,
            identifier,
        },
    })
}

/// An identifier for a node, qualified by a namespace index into the namespace table
/// of the node set that owns it.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct NodeId {
    /// The index for a namespace
    pub namespace: u16,
    /// The identifier for the node in the address space
    pub identifier: Identifier,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        write!(f, "{}", self.identifier)
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    /// Parse a node ID on the form `[ns=<namespaceindex>;]<type>=<value>`. Server indices
    /// and namespace URIs are only valid in expanded node IDs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_node_id_parts(s)? {
            NodeIdParts {
                server_index: None,
                namespace_uri: None,
                node_id,
            } => Ok(node_id),
            _ => Err(NodeIdError(s.to_owned())),
        }
    }
}

impl From<&NodeId> for NodeId {
    fn from(v: &NodeId) -> Self {
        v.clone()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::null()
    }
}

impl NodeId {
    /// Constructs a new NodeId from anything that can be turned into Identifier
    /// u32, Guid, ByteString or String
    pub fn new<T>(namespace: u16, value: T) -> NodeId
    where
        T: Into<Identifier>,
    {
        NodeId {
            namespace,
            identifier: value.into(),
        }
    }

    /// Returns a null node id
    pub fn null() -> NodeId {
        NodeId::new(0, 0u32)
    }

    /// Test if the node id is null, i.e. 0 namespace and 0 identifier
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && self.identifier == Identifier::Numeric(0)
    }

    /// Return a copy of this node ID with the namespace index replaced.
    pub fn with_namespace(&self, namespace: u16) -> NodeId {
        NodeId {
            namespace,
            identifier: self.identifier.clone(),
        }
    }
}
