#![warn(missing_docs)]

//! Node set model and composition of OPC UA information models.
//!
//! A [`UaNodeSet`] is a self contained address space model: a namespace table, an alias
//! table, nodes, explicit and implicit references, and data type definitions, where every
//! namespace index is relative to the node set's own namespace table.
//!
//! [`UaNodeSetMerger`] combines two node sets into a new one, unifying their namespace
//! tables and rewriting every identifier into the unified table.
//!
//! With the `xml` feature, node sets can be loaded from NodeSet2 files using
//! [`NodeSet2Loader`], and composed from a YAML description using [`MergeConfig`].

mod aliases;
mod attributes;
mod config;
mod data_type;
mod merger;
mod node_set;
mod references;
#[cfg(feature = "xml")]
mod xml;

#[cfg(feature = "console-logging")]
pub mod console_logging;

pub use aliases::AliasTable;
pub use attributes::{AccessLevel, EventNotifier, NodeAttributes, NodeClass, NodeClassAttributes};
pub use config::{Config, ConfigError, MergeConfig};
pub use data_type::{
    DataTypeDefinition, EnumDefinition, EnumField, StructureDefinition, StructureField,
    StructureType,
};
pub use merger::{
    CollisionPolicy, MergeError, MergeErrorKind, MergeOptions, Operand, UaNodeSetMerger,
};
pub use node_set::UaNodeSet;
pub use references::{CombinedReferences, Reference, ReferenceDirection, ReferenceMap};
#[cfg(feature = "xml")]
pub use xml::{LoadXmlError, NodeSet2Loader};

pub use opcua_nodeset_types as types;
