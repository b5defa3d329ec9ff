//! Structure and enum definitions of data types.

use opcua_nodeset_types::{LocalizedText, NamespaceMapper, NodeId, Remap, RemapError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Kind of structure.
pub enum StructureType {
    #[default]
    /// Structure without optional fields.
    Structure,
    /// Structure where some fields are optional.
    StructureWithOptionalFields,
    /// Union, exactly one field is set.
    Union,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A field in a structure definition.
pub struct StructureField {
    /// Field name.
    pub name: String,
    /// Field description.
    pub description: LocalizedText,
    /// Data type of the field.
    pub data_type: NodeId,
    /// Value rank of the field.
    pub value_rank: i32,
    /// Array dimensions, if the field is an array with fixed dimensions.
    pub array_dimensions: Option<Vec<u32>>,
    /// Maximum string length, 0 means no limit.
    pub max_string_length: u32,
    /// Whether the field is optional.
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Definition of a structured data type.
pub struct StructureDefinition {
    /// The default binary encoding node, or null if unknown.
    pub default_encoding_id: NodeId,
    /// The structure type this one is a subtype of.
    pub base_data_type: NodeId,
    /// Kind of structure.
    pub structure_type: StructureType,
    /// Fields, in order.
    pub fields: Vec<StructureField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A value of an enum definition.
pub struct EnumField {
    /// Numeric value.
    pub value: i64,
    /// Name of the value.
    pub name: String,
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Definition of an enumerated data type.
pub struct EnumDefinition {
    /// Whether values are bit positions of an option set.
    pub is_option_set: bool,
    /// Enum values.
    pub fields: Vec<EnumField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Definition of a data type, keyed by the data type node ID in a node set.
pub enum DataTypeDefinition {
    /// A structure or union.
    Structure(StructureDefinition),
    /// An enum or option set.
    Enum(EnumDefinition),
}

impl From<StructureDefinition> for DataTypeDefinition {
    fn from(value: StructureDefinition) -> Self {
        Self::Structure(value)
    }
}

impl From<EnumDefinition> for DataTypeDefinition {
    fn from(value: EnumDefinition) -> Self {
        Self::Enum(value)
    }
}

impl Remap for StructureField {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        Ok(Self {
            data_type: self.data_type.remap(mapper)?,
            ..self.clone()
        })
    }
}

impl Remap for DataTypeDefinition {
    fn remap(&self, mapper: &mut NamespaceMapper<'_>) -> Result<Self, RemapError> {
        Ok(match self {
            Self::Structure(s) => Self::Structure(StructureDefinition {
                default_encoding_id: s.default_encoding_id.remap(mapper)?,
                base_data_type: s.base_data_type.remap(mapper)?,
                structure_type: s.structure_type,
                fields: s.fields.remap(mapper)?,
            }),
            // Enum definitions carry no identifiers.
            Self::Enum(e) => Self::Enum(e.clone()),
        })
    }
}
