
use crate::{NamespaceTable, NodeId};

pub fn table(uris: &[&str]) -> NamespaceTable {
    NamespaceTable::new_full(uris.iter().copied()).unwrap()
}

pub fn node_id(s: &str) -> NodeId {
    s.parse().unwrap()
}
