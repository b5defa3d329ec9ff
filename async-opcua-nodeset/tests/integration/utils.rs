use std::path::PathBuf;

use opcua_nodeset::{
    types::{ExpandedNodeId, NodeId},
    NodeSet2Loader, UaNodeSet,
};

pub const NODESET1_URI: &str = "http://unittests.org/nodeset1/";
pub const NODESET2_URI: &str = "http://yourorganisation.org/nodeset2/";
pub const NODESET3_URI: &str = "http://yourorganisation.org/nodeset3/";
pub const EXTERNAL_URI: &str = "http://external.org/UA/";

pub fn resource_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join("mergertest")
}

pub fn setup() {
    opcua_nodeset::console_logging::init();
}

pub fn load(file: &str) -> UaNodeSet {
    setup();
    NodeSet2Loader::new("")
        .load_file(resource_dir().join(file))
        .unwrap_or_else(|e| panic!("Failed to load {file}: {e}"))
}

/// nodeset1, independent.
pub fn nodeset1() -> UaNodeSet {
    load("nodeset1.xml")
}

/// nodeset2, references nodeset1.
pub fn nodeset2() -> UaNodeSet {
    load("nodeset2.xml")
}

/// nodeset3, independent.
pub fn nodeset3() -> UaNodeSet {
    load("nodeset3.xml")
}

pub fn index_of(node_set: &UaNodeSet, uri: &str) -> u16 {
    node_set
        .namespaces()
        .get_index(uri)
        .unwrap_or_else(|| panic!("Namespace {uri} is not registered"))
}

pub fn id(namespace: u16, value: u32) -> NodeId {
    NodeId::new(namespace, value)
}

pub fn targets(node_set: &UaNodeSet, source: &NodeId) -> Vec<ExpandedNodeId> {
    node_set
        .explicit_references()
        .get(source)
        .iter()
        .map(|r| r.target_node_id.clone())
        .collect()
}

pub fn browse_name_of(node_set: &UaNodeSet, node_id: &NodeId) -> (u16, String) {
    let node = node_set
        .node(node_id)
        .unwrap_or_else(|| panic!("Missing node {node_id}"));
    (node.browse_name.namespace_index, node.browse_name.name.clone())
}
