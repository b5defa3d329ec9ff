#![warn(missing_docs)]

//! Identifier and namespace types used when composing OPC UA node sets.
//!
//! Every identifier in a node set is qualified by a namespace index that is only
//! meaningful relative to the namespace table of the node set that owns it. This crate
//! contains the identifier types themselves ([`NodeId`], [`ExpandedNodeId`],
//! [`QualifiedName`]), the [`NamespaceTable`] they index into, and the
//! [`Remap`] machinery used to move identifiers from one namespace table into another.

mod byte_string;
mod errors;
mod expanded_node_id;
mod guid;
mod localized_text;
mod namespaces;
mod node_id;
mod qualified_name;
mod remap;

#[cfg(test)]
mod tests;

pub use byte_string::ByteString;
pub use errors::RemapError;
pub use expanded_node_id::ExpandedNodeId;
pub use guid::Guid;
pub use localized_text::LocalizedText;
pub use namespaces::{NamespaceMapper, NamespaceSubstitution, NamespaceTable, OPC_UA_NAMESPACE};
pub use node_id::{Identifier, NodeId, NodeIdError};
pub use qualified_name::{QualifiedName, QualifiedNameError};
pub use remap::Remap;
