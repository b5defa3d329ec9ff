// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Per node payload of a node set.

use bitflags::bitflags;
use opcua_nodeset_types::{
    LocalizedText, NamespaceMapper, NodeId, QualifiedName, Remap, RemapError,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// The class of a node.
pub enum NodeClass {
    /// Object
    Object,
    /// Variable
    Variable,
    /// Method
    Method,
    /// Object type
    ObjectType,
    /// Variable type
    VariableType,
    /// Reference type
    ReferenceType,
    /// Data type
    DataType,
    /// View
    View,
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    /// Variable access level.
    pub struct AccessLevel: u8 {
        /// Read the current value of the node.
        const CURRENT_READ = 1;
        /// Write the current value of the node.
        const CURRENT_WRITE = 2;
        /// Read historical values of the node.
        const HISTORY_READ = 4;
        /// Write historical values of the node.
        const HISTORY_WRITE = 8;
        /// Allow changing properties that define semantics of the parent node.
        const SEMANTIC_CHANGE = 16;
        /// Write the status code of the current value.
        const STATUS_WRITE = 32;
        /// Write the timestamp of the current value.
        const TIMESTAMP_WRITE = 64;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    /// Node event notifier.
    pub struct EventNotifier: u8 {
        /// Allow subscribing to events.
        const SUBSCRIBE_TO_EVENTS = 1;
        /// Allow reading historical events.
        const HISTORY_READ = 4;
        /// Allow writing historical events.
        const HISTORY_WRITE = 8;
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Attributes specific to the class of a node.
pub enum NodeClassAttributes {
    /// Object attributes.
    Object {
        /// Parent node declared in the document, if any.
        parent_node_id: Option<NodeId>,
        /// Event notifier.
        event_notifier: EventNotifier,
    },
    /// Variable attributes.
    Variable {
        /// Parent node declared in the document, if any.
        parent_node_id: Option<NodeId>,
        /// Data type of the value.
        data_type: NodeId,
        /// Value rank.
        value_rank: i32,
        /// Array dimensions, if the value is an array.
        array_dimensions: Option<Vec<u32>>,
        /// Access level.
        access_level: AccessLevel,
        /// User access level.
        user_access_level: AccessLevel,
        /// Minimum sampling interval in milliseconds.
        minimum_sampling_interval: f64,
        /// Whether history is collected.
        historizing: bool,
    },
    /// Method attributes.
    Method {
        /// Parent node declared in the document, if any.
        parent_node_id: Option<NodeId>,
        /// Whether the method is executable.
        executable: bool,
        /// Whether the method is executable by the current user.
        user_executable: bool,
        /// The method declaration on the type, if any.
        method_declaration_id: Option<NodeId>,
    },
    /// View attributes.
    View {
        /// Parent node declared in the document, if any.
        parent_node_id: Option<NodeId>,
        /// Whether the view contains no loops.
        contains_no_loops: bool,
        /// Event notifier.
        event_notifier: EventNotifier,
    },
    /// Object type attributes.
    ObjectType {
        /// Whether the type is abstract.
        is_abstract: bool,
    },
    /// Variable type attributes.
    VariableType {
        /// Whether the type is abstract.
        is_abstract: bool,
        /// Data type of the value.
        data_type: NodeId,
        /// Value rank.
        value_rank: i32,
        /// Array dimensions, if the value is an array.
        array_dimensions: Option<Vec<u32>>,
    },
    /// Data type attributes. The definition is stored separately on the node set.
    DataType {
        /// Whether the type is abstract.
        is_abstract: bool,
    },
    /// Reference type attributes.
    ReferenceType {
        /// Whether the type is abstract.
        is_abstract: bool,
        /// Whether the reference is symmetric.
        symmetric: bool,
        /// Name of the inverse direction.
        inverse_name: Option<LocalizedText>,
    },
}

impl NodeClassAttributes {
    /// Get the node class these attributes belong to.
    pub fn node_class(&self) -> NodeClass {
        match self {
            Self::Object { .. } => NodeClass::Object,
            Self::Variable { .. } => NodeClass::Variable,
            Self::Method { .. } => NodeClass::Method,
            Self::View { .. } => NodeClass::View,
            Self::ObjectType { .. } => NodeClass::ObjectType,
            Self::VariableType { .. } => NodeClass::VariableType,
            Self::DataType { .. } => NodeClass::DataType,
            Self::ReferenceType { .. } => NodeClass::ReferenceType,
        }
    }
}

impl Remap for NodeClassAttributes {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        let mut res = self.clone();
        match &mut res {
            Self::Object { parent_node_id, .. } | Self::View { parent_node_id, .. } => {
                *parent_node_id = parent_node_id.remap(mapper)?;
            }
            Self::Variable {
                parent_node_id,
                data_type,
                ..
            } => {
                *parent_node_id = parent_node_id.remap(mapper)?;
                *data_type = data_type.remap(mapper)?;
            }
            Self::Method {
                parent_node_id,
                method_declaration_id,
                ..
            } => {
                *parent_node_id = parent_node_id.remap(mapper)?;
                *method_declaration_id = method_declaration_id.remap(mapper)?;
            }
            Self::VariableType { data_type, .. } => {
                *data_type = data_type.remap(mapper)?;
            }
            Self::ObjectType { .. } | Self::DataType { .. } | Self::ReferenceType { .. } => (),
        }
        Ok(res)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A node in a node set.
pub struct NodeAttributes {
    /// The node ID, which is the key of the node in the node set.
    pub node_id: NodeId,
    /// The browse name.
    pub browse_name: QualifiedName,
    /// The display name.
    pub display_name: LocalizedText,
    /// Description, if any.
    pub description: Option<LocalizedText>,
    /// Symbolic name, if different from the browse name.
    pub symbolic_name: Option<String>,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Node class specific attributes.
    pub class: NodeClassAttributes,
}

impl NodeAttributes {
    /// Create a new node. The display name defaults to the name part of the browse name.
    pub fn new(
        node_id: impl Into<NodeId>,
        browse_name: impl Into<QualifiedName>,
        class: NodeClassAttributes,
    ) -> Self {
        let browse_name = browse_name.into();
        Self {
            node_id: node_id.into(),
            display_name: LocalizedText::from(browse_name.name.as_str()),
            browse_name,
            description: None,
            symbolic_name: None,
            write_mask: 0,
            user_write_mask: 0,
            class,
        }
    }

    /// Set the display name of the node.
    pub fn with_display_name(mut self, display_name: impl Into<LocalizedText>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description of the node.
    pub fn with_description(mut self, description: impl Into<LocalizedText>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the node class.
    pub fn node_class(&self) -> NodeClass {
        self.class.node_class()
    }
}

impl Remap for NodeAttributes {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        Ok(Self {
            node_id: self.node_id.remap(mapper)?,
            browse_name: self.browse_name.remap(mapper)?,
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            symbolic_name: self.symbolic_name.clone(),
            write_mask: self.write_mask,
            user_write_mask: self.user_write_mask,
            class: self.class.remap(mapper)?,
        })
    }
}
