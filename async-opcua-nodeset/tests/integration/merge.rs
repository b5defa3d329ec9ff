use opcua_nodeset::{
    types::{ExpandedNodeId, NodeId},
    CollisionPolicy, DataTypeDefinition, MergeOptions, NodeClassAttributes, UaNodeSetMerger,
};

use crate::utils::{
    browse_name_of, id, index_of, nodeset1, nodeset2, nodeset3, targets, EXTERNAL_URI,
    NODESET1_URI, NODESET2_URI, NODESET3_URI,
};

fn target(namespace: u16, value: u32) -> ExpandedNodeId {
    ExpandedNodeId::new(id(namespace, value))
}

#[test]
fn merge_no_relations() {
    let result = UaNodeSetMerger::merge(&nodeset1(), &nodeset3()).unwrap();

    let idx1 = index_of(&result, NODESET1_URI);
    let idx3 = index_of(&result, NODESET3_URI);
    assert_eq!((idx1, idx3), (1, 2));
    // Namespace URI overrides in the inputs are registered after both tables.
    assert_eq!(index_of(&result, EXTERNAL_URI), 3);

    assert_eq!(
        browse_name_of(&result, &id(idx1, 5001)),
        (idx1, "TestNode".to_owned())
    );
    assert_eq!(
        browse_name_of(&result, &id(idx3, 5001)),
        (idx3, "TestNode3".to_owned())
    );
    assert_eq!(result.nodes().len(), 9);
    assert!(targets(&result, &id(idx3, 5001)).contains(&target(3, 1000)));
    assert!(targets(&result, &id(idx3, 5001))
        .contains(&ExpandedNodeId::new(NodeId::new(idx3, "StringNode"))));
}

#[test]
fn merge_with_relations() {
    let result = UaNodeSetMerger::merge(&nodeset1(), &nodeset2()).unwrap();

    let idx1 = index_of(&result, NODESET1_URI);
    let idx2 = index_of(&result, NODESET2_URI);
    assert_eq!((idx1, idx2), (1, 2));
    assert_eq!(result.namespaces().len(), 3);

    assert_eq!(
        browse_name_of(&result, &id(idx1, 7001)),
        (idx1, "TestMethod".to_owned())
    );
    assert_eq!(
        browse_name_of(&result, &id(idx2, 7001)),
        (idx2, "TestMethod2".to_owned())
    );

    let r1 = targets(&result, &id(idx1, 5001));
    assert_eq!(r1.len(), 3);
    assert!(r1.contains(&target(idx1, 6001)));

    let r2 = targets(&result, &id(idx2, 5003));
    assert_eq!(r2.len(), 5);
    assert!(r2.contains(&target(idx1, 6001)));
    assert!(r2.contains(&target(idx1, 7001)));
    assert!(r2.contains(&target(idx2, 7001)));

    // The namespace URI override is rewritten to the unified index.
    let method_targets = targets(&result, &id(idx2, 7001));
    assert_eq!(method_targets, vec![target(idx2, 5003), target(idx1, 5001)]);

    // nodeset2 contributes the converse of its reference into nodeset1.
    let implicit = result.implicit_references().get(&id(idx1, 5001));
    assert_eq!(implicit.len(), 3);
    assert_eq!(implicit[2].target_node_id, target(idx2, 7001));
    assert_eq!(result.combined_references().get(&id(idx1, 5001)).count(), 6);

    let NodeClassAttributes::Method { parent_node_id, .. } =
        &result.node(&id(idx2, 7001)).unwrap().class
    else {
        panic!("Expected method");
    };
    assert_eq!(parent_node_id, &Some(id(idx2, 5003)));
}

#[test]
fn merge_with_relations_reverse() {
    let result = UaNodeSetMerger::merge(&nodeset2(), &nodeset1()).unwrap();

    let idx1 = index_of(&result, NODESET2_URI);
    let idx2 = index_of(&result, NODESET1_URI);
    assert_eq!((idx1, idx2), (1, 2));

    assert_eq!(
        browse_name_of(&result, &id(idx1, 7001)),
        (idx1, "TestMethod2".to_owned())
    );
    assert_eq!(
        browse_name_of(&result, &id(idx2, 7001)),
        (idx2, "TestMethod".to_owned())
    );

    let r1 = targets(&result, &id(idx2, 5001));
    assert_eq!(r1.len(), 3);
    assert!(r1.contains(&target(2, 6001)));

    let r2 = targets(&result, &id(idx1, 5003));
    assert_eq!(r2.len(), 5);
    assert!(r2.contains(&target(idx2, 6001)));
    assert!(r2.contains(&target(idx2, 7001)));
    assert!(r2.contains(&target(idx1, 7001)));
}

#[test]
fn merge_with_duplicate() {
    let ns1 = nodeset1();
    let result = UaNodeSetMerger::merge(&ns1, &ns1).unwrap();

    assert_eq!(result.namespaces().get_index(NODESET1_URI), Some(1));
    assert_eq!(result.namespaces(), ns1.namespaces());
    assert_eq!(result.nodes().len(), ns1.nodes().len());
    assert_eq!(result.nodes(), ns1.nodes());
    assert_eq!(result.aliases(), ns1.aliases());
    assert_eq!(result.data_type_definitions(), ns1.data_type_definitions());

    assert_eq!(
        result.combined_references().len(),
        ns1.combined_references().len() * 2
    );
    assert_eq!(
        result.explicit_references().len(),
        ns1.explicit_references().len() * 2
    );
    assert_eq!(
        result.implicit_references().len(),
        ns1.implicit_references().len() * 2
    );
    // Duplicates are kept as distinct entries.
    assert_eq!(targets(&result, &id(1, 5001)).len(), 6);
}

#[test]
fn merge_with_duplicate_registers_uri_overrides() {
    let ns3 = nodeset3();
    let result = UaNodeSetMerger::merge(&ns3, &ns3).unwrap();

    // The table only grows by the namespace named through `nsu=` in a reference target.
    let mut expected: Vec<_> = ns3.namespaces().uris().collect();
    expected.push(EXTERNAL_URI);
    assert_eq!(result.namespaces().uris().collect::<Vec<_>>(), expected);
    assert_eq!(index_of(&result, NODESET3_URI), 1);
    assert_eq!(index_of(&result, EXTERNAL_URI), 2);

    assert_eq!(result.nodes(), ns3.nodes());
    assert_eq!(result.aliases(), ns3.aliases());
    assert_eq!(result.data_type_definitions(), ns3.data_type_definitions());
    assert_eq!(
        result.explicit_references().len(),
        ns3.explicit_references().len() * 2
    );
    assert_eq!(
        result.implicit_references().len(),
        ns3.implicit_references().len() * 2
    );
    assert_eq!(
        result.combined_references().len(),
        ns3.combined_references().len() * 2
    );

    let external = targets(&result, &id(1, 5001))
        .into_iter()
        .filter(|t| *t == target(2, 1000))
        .count();
    assert_eq!(external, 2);
}

#[test]
fn merge_duplicate_with_reject_policy() {
    // Identical definitions are not collisions.
    let ns2 = nodeset2();
    let options = MergeOptions {
        collision_policy: CollisionPolicy::Reject,
    };
    let result = UaNodeSetMerger::merge_with_options(&ns2, &ns2, &options).unwrap();
    assert_eq!(result.namespaces(), ns2.namespaces());
    assert_eq!(result.nodes().len(), 2);
    assert_eq!(result.explicit_references().len(), 14);
}

#[test]
fn merge_with_three() {
    let result = UaNodeSetMerger::merge(&nodeset1(), &nodeset2()).unwrap();
    let result = UaNodeSetMerger::merge(&result, &nodeset3()).unwrap();

    let idx1 = index_of(&result, NODESET1_URI);
    let idx2 = index_of(&result, NODESET2_URI);
    let idx3 = index_of(&result, NODESET3_URI);
    assert_ne!(idx1, idx2);
    assert_ne!(idx1, idx3);
    assert_ne!(idx2, idx3);

    assert_eq!(
        browse_name_of(&result, &id(idx1, 5001)),
        (idx1, "TestNode".to_owned())
    );
    assert_eq!(
        browse_name_of(&result, &id(idx3, 5001)),
        (idx3, "TestNode3".to_owned())
    );

    assert_eq!(result.nodes().len(), 11);
    assert_eq!(result.explicit_references().len(), 25);
    assert_eq!(result.implicit_references().len(), 24);
}

#[test]
fn chained_merges_are_associative() {
    let (ns1, ns2, ns3) = (nodeset1(), nodeset2(), nodeset3());

    let left = UaNodeSetMerger::merge(&UaNodeSetMerger::merge(&ns1, &ns2).unwrap(), &ns3).unwrap();
    let right = UaNodeSetMerger::merge(&ns1, &UaNodeSetMerger::merge(&ns2, &ns3).unwrap()).unwrap();
    let all = UaNodeSetMerger::merge_all([&ns1, &ns2, &ns3], &MergeOptions::default()).unwrap();

    let expected = vec![
        "http://opcfoundation.org/UA/",
        NODESET1_URI,
        NODESET2_URI,
        NODESET3_URI,
        EXTERNAL_URI,
    ];
    assert_eq!(left.namespaces().uris().collect::<Vec<_>>(), expected);
    assert_eq!(right.namespaces().uris().collect::<Vec<_>>(), expected);
    assert_eq!(left, all);

    assert_eq!(left.nodes(), right.nodes());
    assert_eq!(left.data_type_definitions(), right.data_type_definitions());
    assert_eq!(
        left.explicit_references().len(),
        right.explicit_references().len()
    );
    for source in left.explicit_references().sources() {
        let mut l = left.explicit_references().get(source).to_vec();
        let mut r = right.explicit_references().get(source).to_vec();
        l.sort_by_key(|r| r.target_node_id.to_string());
        r.sort_by_key(|r| r.target_node_id.to_string());
        assert_eq!(l, r, "References of {source} differ");
    }
}

#[test]
fn merge_leaves_inputs_unchanged() {
    let (ns1, ns2) = (nodeset1(), nodeset2());
    let (before1, before2) = (ns1.clone(), ns2.clone());

    let result = UaNodeSetMerger::merge(&ns1, &ns2).unwrap();
    let _ = UaNodeSetMerger::merge(&result, &ns1).unwrap();

    assert_eq!(ns1, before1);
    assert_eq!(ns2, before2);
    // The URI override in nodeset2 is still unresolved in the input.
    assert_eq!(
        ns2.explicit_references().get(&id(1, 7001))[1]
            .target_node_id
            .namespace_uri
            .as_deref(),
        Some(NODESET1_URI)
    );
}

#[test]
fn merge_remaps_data_type_definitions_and_aliases() {
    let result = UaNodeSetMerger::merge(&nodeset2(), &nodeset1()).unwrap();
    let idx1 = index_of(&result, NODESET1_URI);
    assert_eq!(idx1, 2);

    assert_eq!(result.data_type_definitions().len(), 2);
    let Some(DataTypeDefinition::Structure(def)) = result.data_type_definition(&id(idx1, 3002))
    else {
        panic!("Expected structure");
    };
    assert_eq!(def.base_data_type, id(0, 22));
    assert_eq!(def.default_encoding_id, id(idx1, 5002));
    assert_eq!(def.fields[1].data_type, id(idx1, 3001));
    assert!(matches!(
        result.data_type_definition(&id(idx1, 3001)),
        Some(DataTypeDefinition::Enum(_))
    ));

    // Aliases from both documents agree, the union has those of nodeset1.
    assert_eq!(result.aliases().len(), 8);
    assert_eq!(result.aliases().get("HasComponent"), Some(&id(0, 47)));
    assert_eq!(result.aliases().get("Int32"), Some(&id(0, 6)));
}
