//! The subset of the NodeSet2 schema needed to build an address space model.
//!
//! Values of variables and variable types are not loaded.

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};

use crate::{
    ext::{
        children_with_name, first_child_with_name_opt, value_from_attr, value_from_attr_opt,
        value_from_contents, NodeExt,
    },
    FromValue, XmlError, XmlLoad,
};

/// Contents of a NodeSet2 document.
#[derive(Debug)]
pub struct NodeSet2 {
    /// The `<UANodeSet>` element, if present.
    pub node_set: Option<UANodeSet>,
}

/// Load a NodeSet2 document from a string.
pub fn load_nodeset2_file(document: &str) -> Result<NodeSet2, XmlError> {
    let document = Document::parse(document)?;
    let root = document.root();
    Ok(NodeSet2 {
        node_set: first_child_with_name_opt(&root, "UANodeSet")?,
    })
}

macro_rules! value_wrapper {
    ($(#[$meta:meta])* $key:ident, $ty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct $key(pub $ty);

        impl FromValue for $key {
            fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XmlError> {
                Ok(Self($ty::from_value(node, attr, v)?))
            }
        }
    };
}

value_wrapper!(
    /// A node ID or alias as written in the document.
    NodeId,
    String
);
value_wrapper!(
    /// A qualified name on the form `[<ns>:]<name>` as written in the document.
    QualifiedName,
    String
);

impl FromValue for DateTime<Utc> {
    fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XmlError> {
        let v = DateTime::parse_from_rfc3339(v)
            .map_err(|e| XmlError::invalid_value(node, attr, v, e))?;
        Ok(v.with_timezone(&Utc))
    }
}

/// The `<UANodeSet>` element.
#[derive(Debug)]
pub struct UANodeSet {
    /// Namespace URIs of the document, the first entry has index 1.
    pub namespace_uris: Vec<String>,
    /// Aliases declared in the document.
    pub aliases: Vec<NodeIdAlias>,
    /// Nodes in document order.
    pub nodes: Vec<UANode>,
    /// Time the document was last modified.
    pub last_modified: Option<DateTime<Utc>>,
}

impl<'input> XmlLoad<'input> for UANodeSet {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        // Single pass over the children, a node set may have many thousands of them.
        let mut namespace_uris = Vec::new();
        let mut aliases = Vec::new();
        let mut nodes = Vec::new();
        for child in node.children().filter(|c| c.is_element()) {
            match child.tag_name().name() {
                "NamespaceUris" => {
                    namespace_uris = child
                        .with_name("Uri")
                        .map(|u| u.try_contents().map(|c| c.trim().to_owned()))
                        .collect::<Result<Vec<_>, _>>()?;
                }
                "Aliases" => aliases = children_with_name(&child, "Alias")?,
                _ => {
                    if let Some(node) = UANode::from_node(&child)? {
                        nodes.push(node);
                    }
                }
            }
        }

        Ok(Self {
            namespace_uris,
            aliases,
            nodes,
            last_modified: value_from_attr_opt(node, "LastModified")?,
        })
    }
}

/// An `<Alias>` entry.
#[derive(Debug, Clone)]
pub struct NodeIdAlias {
    /// The alias token.
    pub alias: String,
    /// The node ID it stands for.
    pub id: NodeId,
}

impl<'input> XmlLoad<'input> for NodeIdAlias {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            alias: node.try_attribute("Alias")?.to_owned(),
            id: value_from_contents(node)?,
        })
    }
}

/// A localized text element.
#[derive(Debug, Default, Clone)]
pub struct LocalizedText {
    /// Locale, empty if not given.
    pub locale: String,
    /// The text.
    pub text: String,
}

impl<'input> XmlLoad<'input> for LocalizedText {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            locale: node.attribute("Locale").unwrap_or_default().to_owned(),
            text: node.text().unwrap_or_default().to_owned(),
        })
    }
}

/// A `<Reference>` element under `<References>`.
#[derive(Debug, Clone)]
pub struct Reference {
    /// The node on the other end of the reference.
    pub target: NodeId,
    /// The reference type, often an alias.
    pub reference_type: NodeId,
    /// Direction, seen from the node that declares the reference.
    pub is_forward: bool,
}

impl<'input> XmlLoad<'input> for Reference {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            target: value_from_contents(node)?,
            reference_type: value_from_attr(node, "ReferenceType")?,
            is_forward: value_from_attr_opt(node, "IsForward")?.unwrap_or(true),
        })
    }
}

/// Attributes and children common to every node class.
#[derive(Debug)]
pub struct UANodeBase {
    /// The node ID.
    pub node_id: NodeId,
    /// The browse name.
    pub browse_name: QualifiedName,
    /// Symbolic name, if different from the browse name.
    pub symbolic_name: Option<String>,
    /// Write mask.
    pub write_mask: u32,
    /// User write mask.
    pub user_write_mask: u32,
    /// Display names, one per locale.
    pub display_names: Vec<LocalizedText>,
    /// Descriptions, one per locale.
    pub descriptions: Vec<LocalizedText>,
    /// Free form documentation.
    pub documentation: Option<String>,
    /// References declared on this node.
    pub references: Vec<Reference>,
}

impl<'input> XmlLoad<'input> for UANodeBase {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        let references = match node.first_child_with_name("References") {
            Ok(refs) => children_with_name(&refs, "Reference")?,
            Err(_) => Vec::new(),
        };
        Ok(Self {
            node_id: value_from_attr(node, "NodeId")?,
            browse_name: value_from_attr(node, "BrowseName")?,
            symbolic_name: value_from_attr_opt(node, "SymbolicName")?,
            write_mask: value_from_attr_opt(node, "WriteMask")?.unwrap_or(0),
            user_write_mask: value_from_attr_opt(node, "UserWriteMask")?.unwrap_or(0),
            display_names: children_with_name(node, "DisplayName")?,
            descriptions: children_with_name(node, "Description")?,
            documentation: first_child_with_name_opt(node, "Documentation")?,
            references,
        })
    }
}

/// A node in a NodeSet2 document: the common base and the class specific part.
#[derive(Debug)]
pub struct UANode {
    /// Common attributes.
    pub base: UANodeBase,
    /// Node class specific attributes.
    pub kind: UANodeKind,
}

impl UANode {
    /// Load a node from an element, returning `None` if the element is not a node.
    pub fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XmlError> {
        let kind = match node.tag_name().name() {
            "UAObject" => UANodeKind::Object(XmlLoad::load(node)?),
            "UAVariable" => UANodeKind::Variable(XmlLoad::load(node)?),
            "UAMethod" => UANodeKind::Method(XmlLoad::load(node)?),
            "UAView" => UANodeKind::View(XmlLoad::load(node)?),
            "UAObjectType" => UANodeKind::ObjectType(XmlLoad::load(node)?),
            "UAVariableType" => UANodeKind::VariableType(XmlLoad::load(node)?),
            "UADataType" => UANodeKind::DataType(XmlLoad::load(node)?),
            "UAReferenceType" => UANodeKind::ReferenceType(XmlLoad::load(node)?),
            _ => return Ok(None),
        };
        Ok(Some(Self {
            base: XmlLoad::load(node)?,
            kind,
        }))
    }
}

/// Node class specific part of a [`UANode`].
#[derive(Debug)]
pub enum UANodeKind {
    /// `<UAObject>`
    Object(UAObject),
    /// `<UAVariable>`
    Variable(UAVariable),
    /// `<UAMethod>`
    Method(UAMethod),
    /// `<UAView>`
    View(UAView),
    /// `<UAObjectType>`
    ObjectType(UAObjectType),
    /// `<UAVariableType>`
    VariableType(UAVariableType),
    /// `<UADataType>`
    DataType(UADataType),
    /// `<UAReferenceType>`
    ReferenceType(UAReferenceType),
}

/// Object attributes.
#[derive(Debug)]
pub struct UAObject {
    /// Parent node, if declared.
    pub parent_node_id: Option<NodeId>,
    /// Event notifier bits.
    pub event_notifier: u8,
}

impl<'input> XmlLoad<'input> for UAObject {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            parent_node_id: value_from_attr_opt(node, "ParentNodeId")?,
            event_notifier: value_from_attr_opt(node, "EventNotifier")?.unwrap_or(0),
        })
    }
}

/// Variable attributes.
#[derive(Debug)]
pub struct UAVariable {
    /// Parent node, if declared.
    pub parent_node_id: Option<NodeId>,
    /// Data type of the value.
    pub data_type: NodeId,
    /// Value rank.
    pub value_rank: i32,
    /// Comma separated array dimensions.
    pub array_dimensions: String,
    /// Access level bits.
    pub access_level: u8,
    /// User access level bits.
    pub user_access_level: u8,
    /// Minimum sampling interval in milliseconds.
    pub minimum_sampling_interval: f64,
    /// Whether history is collected.
    pub historizing: bool,
}

fn default_data_type() -> NodeId {
    // BaseDataType
    NodeId("i=24".to_owned())
}

impl<'input> XmlLoad<'input> for UAVariable {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            parent_node_id: value_from_attr_opt(node, "ParentNodeId")?,
            data_type: value_from_attr_opt(node, "DataType")?.unwrap_or_else(default_data_type),
            value_rank: value_from_attr_opt(node, "ValueRank")?.unwrap_or(-1),
            array_dimensions: value_from_attr_opt(node, "ArrayDimensions")?.unwrap_or_default(),
            access_level: value_from_attr_opt(node, "AccessLevel")?.unwrap_or(1),
            user_access_level: value_from_attr_opt(node, "UserAccessLevel")?.unwrap_or(1),
            minimum_sampling_interval: value_from_attr_opt(node, "MinimumSamplingInterval")?
                .unwrap_or(0.0),
            historizing: value_from_attr_opt(node, "Historizing")?.unwrap_or(false),
        })
    }
}

/// Method attributes.
#[derive(Debug)]
pub struct UAMethod {
    /// Parent node, if declared.
    pub parent_node_id: Option<NodeId>,
    /// Whether the method is executable.
    pub executable: bool,
    /// Whether the method is executable by the current user.
    pub user_executable: bool,
    /// The method on the type this method is an instance of.
    pub method_declaration_id: Option<NodeId>,
}

impl<'input> XmlLoad<'input> for UAMethod {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            parent_node_id: value_from_attr_opt(node, "ParentNodeId")?,
            executable: value_from_attr_opt(node, "Executable")?.unwrap_or(true),
            user_executable: value_from_attr_opt(node, "UserExecutable")?.unwrap_or(true),
            method_declaration_id: value_from_attr_opt(node, "MethodDeclarationId")?,
        })
    }
}

/// View attributes.
#[derive(Debug)]
pub struct UAView {
    /// Parent node, if declared.
    pub parent_node_id: Option<NodeId>,
    /// Whether following forward hierarchical references never loops.
    pub contains_no_loops: bool,
    /// Event notifier bits.
    pub event_notifier: u8,
}

impl<'input> XmlLoad<'input> for UAView {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            parent_node_id: value_from_attr_opt(node, "ParentNodeId")?,
            contains_no_loops: value_from_attr_opt(node, "ContainsNoLoops")?.unwrap_or(false),
            event_notifier: value_from_attr_opt(node, "EventNotifier")?.unwrap_or(0),
        })
    }
}

/// Object type attributes.
#[derive(Debug)]
pub struct UAObjectType {
    /// Whether the type is abstract.
    pub is_abstract: bool,
}

impl<'input> XmlLoad<'input> for UAObjectType {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            is_abstract: value_from_attr_opt(node, "IsAbstract")?.unwrap_or(false),
        })
    }
}

/// Variable type attributes.
#[derive(Debug)]
pub struct UAVariableType {
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Data type of the value.
    pub data_type: NodeId,
    /// Value rank.
    pub value_rank: i32,
    /// Comma separated array dimensions.
    pub array_dimensions: String,
}

impl<'input> XmlLoad<'input> for UAVariableType {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            is_abstract: value_from_attr_opt(node, "IsAbstract")?.unwrap_or(false),
            data_type: value_from_attr_opt(node, "DataType")?.unwrap_or_else(default_data_type),
            value_rank: value_from_attr_opt(node, "ValueRank")?.unwrap_or(-1),
            array_dimensions: value_from_attr_opt(node, "ArrayDimensions")?.unwrap_or_default(),
        })
    }
}

/// Data type attributes.
#[derive(Debug)]
pub struct UADataType {
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Structure or enum definition, if any.
    pub definition: Option<DataTypeDefinition>,
}

impl<'input> XmlLoad<'input> for UADataType {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            is_abstract: value_from_attr_opt(node, "IsAbstract")?.unwrap_or(false),
            definition: first_child_with_name_opt(node, "Definition")?,
        })
    }
}

/// Reference type attributes.
#[derive(Debug)]
pub struct UAReferenceType {
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Whether the reference means the same in both directions.
    pub symmetric: bool,
    /// Names of the inverse direction, one per locale.
    pub inverse_names: Vec<LocalizedText>,
}

impl<'input> XmlLoad<'input> for UAReferenceType {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            is_abstract: value_from_attr_opt(node, "IsAbstract")?.unwrap_or(false),
            symmetric: value_from_attr_opt(node, "Symmetric")?.unwrap_or(false),
            inverse_names: children_with_name(node, "InverseName")?,
        })
    }
}

/// A `<Definition>` element of a data type.
#[derive(Debug)]
pub struct DataTypeDefinition {
    /// Name of the definition.
    pub name: QualifiedName,
    /// Whether this is a union.
    pub is_union: bool,
    /// Whether this is an option set.
    pub is_option_set: bool,
    /// Structure or enum fields.
    pub fields: Vec<DataTypeField>,
}

impl<'input> XmlLoad<'input> for DataTypeDefinition {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            name: value_from_attr(node, "Name")?,
            is_union: value_from_attr_opt(node, "IsUnion")?.unwrap_or(false),
            is_option_set: value_from_attr_opt(node, "IsOptionSet")?.unwrap_or(false),
            fields: children_with_name(node, "Field")?,
        })
    }
}

/// A `<Field>` of a data type definition.
#[derive(Debug)]
pub struct DataTypeField {
    /// Field name.
    pub name: String,
    /// Display names, one per locale.
    pub display_names: Vec<LocalizedText>,
    /// Descriptions, one per locale.
    pub descriptions: Vec<LocalizedText>,
    /// Data type of a structure field.
    pub data_type: NodeId,
    /// Value rank of a structure field.
    pub value_rank: i32,
    /// Comma separated array dimensions.
    pub array_dimensions: String,
    /// Maximum string length, 0 for no limit.
    pub max_string_length: u32,
    /// Value of an enum field.
    pub value: Option<i64>,
    /// Whether a structure field is optional.
    pub is_optional: bool,
}

impl<'input> XmlLoad<'input> for DataTypeField {
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        Ok(Self {
            name: value_from_attr(node, "Name")?,
            display_names: children_with_name(node, "DisplayName")?,
            descriptions: children_with_name(node, "Description")?,
            data_type: value_from_attr_opt(node, "DataType")?.unwrap_or_else(default_data_type),
            value_rank: value_from_attr_opt(node, "ValueRank")?.unwrap_or(-1),
            array_dimensions: value_from_attr_opt(node, "ArrayDimensions")?.unwrap_or_default(),
            max_string_length: value_from_attr_opt(node, "MaxStringLength")?.unwrap_or(0),
            value: value_from_attr_opt(node, "Value")?,
            is_optional: value_from_attr_opt(node, "IsOptional")?.unwrap_or(false),
        })
    }
}
