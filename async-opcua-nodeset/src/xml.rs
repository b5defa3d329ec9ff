//! Loading of node sets from NodeSet2 XML documents.

use std::{path::Path, str::FromStr};

use hashbrown::HashMap;
use log::{debug, trace, warn};
use opcua_nodeset_types::{
    ExpandedNodeId, LocalizedText, NamespaceSubstitution, NamespaceTable, NodeId, QualifiedName,
    RemapError,
};
use opcua_nodeset_xml::{
    load_nodeset2_file,
    schema::ua_node_set::{self, UANode, UANodeKind, UANodeSet},
    XmlError,
};

use crate::{
    AccessLevel, DataTypeDefinition, EnumDefinition, EnumField, EventNotifier, NodeAttributes,
    NodeClassAttributes, Reference, ReferenceDirection, StructureDefinition, StructureField,
    StructureType, UaNodeSet,
};

const HAS_SUBTYPE: NodeId = NodeId {
    namespace: 0,
    identifier: opcua_nodeset_types::Identifier::Numeric(45),
};
const HAS_ENCODING: NodeId = NodeId {
    namespace: 0,
    identifier: opcua_nodeset_types::Identifier::Numeric(38),
};

#[derive(thiserror::Error, Debug)]
/// Error when loading NodeSet2 XML.
pub enum LoadXmlError {
    /// The XML file failed to parse.
    #[error("{0}")]
    Xml(#[from] XmlError),
    /// The file failed to load.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The nodeset section is missing from the file. It is most likely invalid.
    #[error("Missing <UANodeSet> section from file")]
    MissingNodeSet,
    /// The namespace array of the document is invalid.
    #[error("Invalid namespace array: {0}")]
    Namespaces(#[from] RemapError),
    /// A node in the document is invalid.
    #[error("Failed to import node {node_id}: {message}")]
    InvalidNode {
        /// The node ID as written in the document.
        node_id: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Loader of [`UaNodeSet`]s from NodeSet2 documents.
///
/// Namespace index `k` of the document becomes index `k` of the node set's namespace
/// table, with the base namespace at index 0.
pub struct NodeSet2Loader {
    preferred_locale: String,
}

struct DocumentContext<'a> {
    aliases: HashMap<&'a str, &'a str>,
    substitution: NamespaceSubstitution,
}

impl DocumentContext<'_> {
    fn resolve_alias<'b>(&'b self, id: &'b str) -> &'b str {
        self.aliases.get(id).copied().unwrap_or(id)
    }

    fn make_node_id(&self, node_id: &ua_node_set::NodeId) -> Result<NodeId, String> {
        let raw = self.resolve_alias(&node_id.0);
        let parsed = NodeId::from_str(raw).map_err(|e| e.to_string())?;
        let namespace = self
            .substitution
            .get_index(parsed.namespace)
            .map_err(|e| format!("{raw}: {e}"))?;
        Ok(parsed.with_namespace(namespace))
    }

    fn make_expanded_node_id(
        &self,
        node_id: &ua_node_set::NodeId,
    ) -> Result<ExpandedNodeId, String> {
        let raw = self.resolve_alias(&node_id.0);
        let mut parsed = ExpandedNodeId::from_str(raw).map_err(|e| e.to_string())?;
        // Indices of other servers and URI overrides are kept as written.
        if parsed.server_index == 0 && parsed.namespace_uri.is_none() {
            let namespace = self
                .substitution
                .get_index(parsed.node_id.namespace)
                .map_err(|e| format!("{raw}: {e}"))?;
            parsed.node_id.namespace = namespace;
        }
        Ok(parsed)
    }

    fn make_qualified_name(
        &self,
        name: &ua_node_set::QualifiedName,
    ) -> Result<QualifiedName, String> {
        let parsed = QualifiedName::from_str(&name.0).map_err(|e| e.to_string())?;
        let namespace_index = self
            .substitution
            .get_index(parsed.namespace_index)
            .map_err(|e| format!("{}: {e}", name.0))?;
        Ok(QualifiedName {
            namespace_index,
            name: parsed.name,
        })
    }
}

fn make_array_dimensions(dims: &str) -> Result<Option<Vec<u32>>, String> {
    if dims.trim().is_empty() {
        return Ok(None);
    }
    let values = dims
        .split(',')
        .map(|d| d.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("Invalid array dimensions: {dims}"))?;
    Ok(Some(values))
}

impl NodeSet2Loader {
    /// Create a new loader. When a node has display names in several locales, the one
    /// in `preferred_locale` is used.
    pub fn new(preferred_locale: &str) -> Self {
        Self {
            preferred_locale: preferred_locale.to_owned(),
        }
    }

    /// Load a node set from a NodeSet2 file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<UaNodeSet, LoadXmlError> {
        let path = path.as_ref();
        debug!("Loading node set from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Load a node set from a string containing a NodeSet2 document.
    pub fn load_str(&self, document: &str) -> Result<UaNodeSet, LoadXmlError> {
        let nodeset = load_nodeset2_file(document)?;
        let nodeset = nodeset.node_set.ok_or(LoadXmlError::MissingNodeSet)?;
        self.load_node_set(&nodeset)
    }

    /// Build a node set from an already parsed `<UANodeSet>` element.
    pub fn load_node_set(&self, raw: &UANodeSet) -> Result<UaNodeSet, LoadXmlError> {
        let mut namespaces = NamespaceTable::new();
        let substitution =
            namespaces.register_uris(raw.namespace_uris.iter().map(|u| u.as_str()))?;
        let ctx = DocumentContext {
            aliases: raw
                .aliases
                .iter()
                .map(|a| (a.alias.as_str(), a.id.0.as_str()))
                .collect(),
            substitution,
        };

        let mut node_set = UaNodeSet::new(namespaces);
        for alias in &raw.aliases {
            let id = ctx
                .make_node_id(&alias.id)
                .map_err(|message| LoadXmlError::InvalidNode {
                    node_id: format!("alias {}", alias.alias),
                    message,
                })?;
            node_set.insert_alias(alias.alias.as_str(), id);
        }

        for node in &raw.nodes {
            self.load_node(&ctx, &mut node_set, node)
                .map_err(|message| LoadXmlError::InvalidNode {
                    node_id: node.base.node_id.0.clone(),
                    message,
                })?;
        }
        Self::link_structure_definitions(&mut node_set);

        debug!(
            "Loaded node set with {} namespaces, {} nodes and {} references",
            node_set.namespaces().len(),
            node_set.nodes().len(),
            node_set.explicit_references().len()
        );
        Ok(node_set)
    }

    fn select_localized_text(&self, texts: &[ua_node_set::LocalizedText]) -> Option<LocalizedText> {
        let mut selected = None;
        for text in texts {
            if (text.locale.is_empty() && selected.is_none())
                || text.locale == self.preferred_locale
            {
                selected = Some(text);
            }
        }
        let selected = selected.or_else(|| texts.first())?;
        Some(LocalizedText::new(&selected.locale, &selected.text))
    }

    fn load_node(
        &self,
        ctx: &DocumentContext<'_>,
        node_set: &mut UaNodeSet,
        node: &UANode,
    ) -> Result<(), String> {
        let base = &node.base;
        let node_id = ctx.make_node_id(&base.node_id)?;
        trace!("Importing node {node_id}");

        let class = match &node.kind {
            UANodeKind::Object(o) => NodeClassAttributes::Object {
                parent_node_id: Self::make_opt_node_id(ctx, &o.parent_node_id)?,
                event_notifier: EventNotifier::from_bits_truncate(o.event_notifier),
            },
            UANodeKind::Variable(v) => NodeClassAttributes::Variable {
                parent_node_id: Self::make_opt_node_id(ctx, &v.parent_node_id)?,
                data_type: ctx.make_node_id(&v.data_type)?,
                value_rank: v.value_rank,
                array_dimensions: make_array_dimensions(&v.array_dimensions)?,
                access_level: AccessLevel::from_bits_truncate(v.access_level),
                user_access_level: AccessLevel::from_bits_truncate(v.user_access_level),
                minimum_sampling_interval: v.minimum_sampling_interval,
                historizing: v.historizing,
            },
            UANodeKind::Method(m) => NodeClassAttributes::Method {
                parent_node_id: Self::make_opt_node_id(ctx, &m.parent_node_id)?,
                executable: m.executable,
                user_executable: m.user_executable,
                method_declaration_id: Self::make_opt_node_id(ctx, &m.method_declaration_id)?,
            },
            UANodeKind::View(v) => NodeClassAttributes::View {
                parent_node_id: Self::make_opt_node_id(ctx, &v.parent_node_id)?,
                contains_no_loops: v.contains_no_loops,
                event_notifier: EventNotifier::from_bits_truncate(v.event_notifier),
            },
            UANodeKind::ObjectType(t) => NodeClassAttributes::ObjectType {
                is_abstract: t.is_abstract,
            },
            UANodeKind::VariableType(t) => NodeClassAttributes::VariableType {
                is_abstract: t.is_abstract,
                data_type: ctx.make_node_id(&t.data_type)?,
                value_rank: t.value_rank,
                array_dimensions: make_array_dimensions(&t.array_dimensions)?,
            },
            UANodeKind::DataType(t) => NodeClassAttributes::DataType {
                is_abstract: t.is_abstract,
            },
            UANodeKind::ReferenceType(t) => NodeClassAttributes::ReferenceType {
                is_abstract: t.is_abstract,
                symmetric: t.symmetric,
                inverse_name: self.select_localized_text(&t.inverse_names),
            },
        };

        let browse_name = ctx.make_qualified_name(&base.browse_name)?;
        let attributes = NodeAttributes {
            node_id: node_id.clone(),
            display_name: self
                .select_localized_text(&base.display_names)
                .unwrap_or_else(|| LocalizedText::from(browse_name.name.as_str())),
            browse_name,
            description: self.select_localized_text(&base.descriptions),
            symbolic_name: base.symbolic_name.clone(),
            write_mask: base.write_mask,
            user_write_mask: base.user_write_mask,
            class,
        };

        let mut references = Vec::with_capacity(base.references.len());
        for rf in &base.references {
            let target = ctx
                .make_expanded_node_id(&rf.target)
                .map_err(|e| format!("Invalid reference target {}: {e}", rf.target.0))?;
            let reference_type = ctx
                .make_node_id(&rf.reference_type)
                .map_err(|e| format!("Invalid reference type {}: {e}", rf.reference_type.0))?;
            references.push(Reference::new(
                node_id.clone(),
                reference_type,
                target,
                ReferenceDirection::from(rf.is_forward),
            ));
        }

        if let UANodeKind::DataType(t) = &node.kind {
            if let Some(def) = &t.definition {
                let definition = self.make_data_type_def(ctx, def)?;
                node_set.insert_data_type_definition(node_id.clone(), definition);
            }
        }

        if node_set.insert_node(attributes).is_some() {
            warn!("Node {node_id} is defined more than once, keeping the last definition");
        }
        for reference in references {
            node_set.add_reference(reference);
        }
        Ok(())
    }

    fn make_opt_node_id(
        ctx: &DocumentContext<'_>,
        node_id: &Option<ua_node_set::NodeId>,
    ) -> Result<Option<NodeId>, String> {
        node_id.as_ref().map(|n| ctx.make_node_id(n)).transpose()
    }

    fn make_data_type_def(
        &self,
        ctx: &DocumentContext<'_>,
        def: &ua_node_set::DataTypeDefinition,
    ) -> Result<DataTypeDefinition, String> {
        let is_enum = def.fields.iter().any(|f| f.value.is_some());
        if is_enum {
            // `None` once the previous value was `i64::MAX`.
            let mut next_value = Some(0i64);
            let mut fields = Vec::with_capacity(def.fields.len());
            for field in &def.fields {
                let value = match field.value {
                    Some(v) => v,
                    None => next_value.ok_or_else(|| {
                        format!("Enum field {} has no value following i64::MAX", field.name)
                    })?,
                };
                next_value = value.checked_add(1);
                fields.push(EnumField {
                    value,
                    name: field.name.clone(),
                    display_name: self
                        .select_localized_text(&field.display_names)
                        .unwrap_or_else(|| LocalizedText::from(field.name.as_str())),
                    description: self
                        .select_localized_text(&field.descriptions)
                        .unwrap_or_default(),
                });
            }
            return Ok(DataTypeDefinition::Enum(EnumDefinition {
                is_option_set: def.is_option_set,
                fields,
            }));
        }

        let mut any_optional = false;
        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            any_optional |= field.is_optional;
            fields.push(StructureField {
                name: field.name.clone(),
                description: self
                    .select_localized_text(&field.descriptions)
                    .unwrap_or_default(),
                data_type: ctx.make_node_id(&field.data_type)?,
                value_rank: field.value_rank,
                array_dimensions: make_array_dimensions(&field.array_dimensions)?,
                max_string_length: field.max_string_length,
                is_optional: field.is_optional,
            });
        }
        // Filled in by `link_structure_definitions` once every node is loaded.
        Ok(DataTypeDefinition::Structure(StructureDefinition {
            default_encoding_id: NodeId::null(),
            base_data_type: NodeId::null(),
            structure_type: if def.is_union {
                StructureType::Union
            } else if any_optional {
                StructureType::StructureWithOptionalFields
            } else {
                StructureType::Structure
            },
            fields,
        }))
    }

    /// Set the base type and default binary encoding of structure definitions from the
    /// `HasSubtype` and `HasEncoding` references of their data type.
    fn link_structure_definitions(node_set: &mut UaNodeSet) {
        let mut links = Vec::new();
        for (id, def) in node_set.data_type_definitions() {
            let DataTypeDefinition::Structure(_) = def else {
                continue;
            };
            let mut base_data_type = None;
            let mut default_encoding_id = None;
            for rf in node_set.explicit_references().get(id) {
                let Some(target) = rf.target_node_id.try_resolve(node_set.namespaces()) else {
                    continue;
                };
                if rf.reference_type_id == HAS_SUBTYPE && !rf.is_forward() {
                    base_data_type = Some(target.into_owned());
                } else if rf.reference_type_id == HAS_ENCODING
                    && rf.is_forward()
                    && node_set
                        .node(&target)
                        .is_some_and(|n| n.browse_name.name == "Default Binary")
                {
                    default_encoding_id = Some(target.into_owned());
                }
            }
            links.push((id.clone(), base_data_type, default_encoding_id));
        }

        for (id, base_data_type, default_encoding_id) in links {
            if let Some(DataTypeDefinition::Structure(def)) =
                node_set.data_type_definitions_mut().get_mut(&id)
            {
                if let Some(base) = base_data_type {
                    def.base_data_type = base;
                } else {
                    debug!("Structure {id} has no HasSubtype reference to its base type");
                }
                if let Some(encoding) = default_encoding_id {
                    def.default_encoding_id = encoding;
                }
            }
        }
    }
}

impl UaNodeSet {
    /// Load a node set from a string containing a NodeSet2 document, preferring
    /// display names without a locale.
    pub fn parse(document: &str) -> Result<Self, LoadXmlError> {
        NodeSet2Loader::new("").load_str(document)
    }

    /// Load a node set from a NodeSet2 file, preferring display names without a locale.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadXmlError> {
        NodeSet2Loader::new("").load_file(path)
    }
}
