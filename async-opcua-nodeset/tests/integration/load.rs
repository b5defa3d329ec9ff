use std::str::FromStr;

use opcua_nodeset::{
    types::{ExpandedNodeId, Identifier, NodeId},
    AccessLevel, DataTypeDefinition, NodeClass, NodeClassAttributes, NodeSet2Loader,
    ReferenceDirection, StructureType,
};

use crate::utils::{
    browse_name_of, id, nodeset1, nodeset2, nodeset3, resource_dir, EXTERNAL_URI, NODESET1_URI,
    NODESET2_URI,
};

#[test]
fn load_independent_node_set() {
    let ns1 = nodeset1();
    assert_eq!(ns1.namespaces().len(), 2);
    assert_eq!(ns1.namespaces().get_index(NODESET1_URI), Some(1));
    assert_eq!(ns1.nodes().len(), 6);
    assert_eq!(ns1.aliases().len(), 8);
    assert_eq!(ns1.explicit_references().len(), 11);
    assert_eq!(ns1.implicit_references().len(), 11);
    assert_eq!(ns1.combined_references().len(), 22);

    assert_eq!(
        browse_name_of(&ns1, &id(1, 5001)),
        (1, "TestNode".to_owned())
    );
    let property = ns1.node(&id(1, 6001)).unwrap();
    assert_eq!(property.node_class(), NodeClass::Variable);
    let NodeClassAttributes::Variable {
        data_type,
        access_level,
        parent_node_id,
        ..
    } = &property.class
    else {
        panic!("Expected variable");
    };
    assert_eq!(data_type, &id(0, 6));
    assert_eq!(
        *access_level,
        AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE
    );
    assert_eq!(parent_node_id, &Some(id(1, 5001)));

    // Encoding objects keep their browse name in the base namespace.
    assert_eq!(
        browse_name_of(&ns1, &id(1, 5002)),
        (0, "Default Binary".to_owned())
    );
}

#[test]
fn load_implicit_references() {
    let ns1 = nodeset1();
    let implicit = ns1.implicit_references().get(&id(1, 5001));
    assert_eq!(implicit.len(), 2);
    assert!(implicit.iter().all(|r| r.direction == ReferenceDirection::Forward));
    assert_eq!(
        implicit[0].target_node_id,
        ExpandedNodeId::new(id(1, 6001))
    );
    assert_eq!(implicit[1].reference_type_id, id(0, 47));

    // The converse of `Organizes` from the objects folder is recorded on the folder.
    let folder = ns1.implicit_references().get(&id(0, 85));
    assert_eq!(folder.len(), 1);
    assert_eq!(folder[0].target_node_id, ExpandedNodeId::new(id(1, 5001)));
    assert!(folder[0].is_forward());

    assert_eq!(ns1.combined_references().get(&id(1, 5001)).count(), 5);
}

#[test]
fn load_dependent_node_set() {
    let ns2 = nodeset2();
    assert_eq!(
        ns2.namespaces().uris().collect::<Vec<_>>(),
        vec!["http://opcfoundation.org/UA/", NODESET2_URI, NODESET1_URI]
    );
    assert_eq!(ns2.nodes().len(), 2);
    assert_eq!(ns2.explicit_references().len(), 7);
    assert_eq!(ns2.implicit_references().len(), 7);

    // Namespace URI overrides are kept as written until the node set is merged.
    let method_refs = ns2.explicit_references().get(&id(1, 7001));
    assert_eq!(method_refs.len(), 2);
    assert_eq!(
        method_refs[1].target_node_id.namespace_uri.as_deref(),
        Some(NODESET1_URI)
    );
    // Its converse is keyed by the resolved node in nodeset1's namespace.
    assert_eq!(ns2.implicit_references().get(&id(2, 5001)).len(), 1);

    let NodeClassAttributes::Method { parent_node_id, .. } = &ns2.node(&id(1, 7001)).unwrap().class
    else {
        panic!("Expected method");
    };
    assert_eq!(parent_node_id, &Some(id(1, 5003)));
}

#[test]
fn load_preferred_locale() {
    let ns2 = NodeSet2Loader::new("de")
        .load_file(resource_dir().join("nodeset2.xml"))
        .unwrap();
    let method = ns2.node(&id(1, 7001)).unwrap();
    assert_eq!(method.display_name.text, "TestMethode2");
    assert_eq!(method.display_name.locale, "de");

    let ns2 = nodeset2();
    let method = ns2.node(&id(1, 7001)).unwrap();
    assert_eq!(method.display_name.text, "TestMethod2");
}

#[test]
fn load_non_numeric_identifiers() {
    let ns3 = nodeset3();
    assert_eq!(ns3.nodes().len(), 3);
    assert_eq!(ns3.explicit_references().len(), 7);
    // The reference into an unknown namespace has no local converse.
    assert_eq!(ns3.implicit_references().len(), 6);
    assert!(ns3.namespaces().get_index(EXTERNAL_URI).is_none());

    let string_node = NodeId::new(1, "StringNode");
    let NodeClassAttributes::Variable {
        value_rank,
        array_dimensions,
        ..
    } = &ns3.node(&string_node).unwrap().class
    else {
        panic!("Expected variable");
    };
    assert_eq!(*value_rank, 1);
    assert_eq!(array_dimensions, &Some(vec![4]));

    let guid_node = NodeId::from_str("ns=1;g=72962b91-fa75-4ae6-8d28-b404dc7daf63").unwrap();
    assert!(matches!(guid_node.identifier, Identifier::Guid(_)));
    assert_eq!(browse_name_of(&ns3, &guid_node), (1, "GuidNode".to_owned()));
    assert_eq!(ns3.explicit_references().get(&guid_node).len(), 1);
}

#[test]
fn load_data_type_definitions() {
    let ns1 = nodeset1();
    assert_eq!(ns1.data_type_definitions().len(), 2);

    let Some(DataTypeDefinition::Enum(def)) = ns1.data_type_definition(&id(1, 3001)) else {
        panic!("Expected enum");
    };
    assert!(!def.is_option_set);
    let fields: Vec<_> = def
        .fields
        .iter()
        .map(|f| (f.value, f.name.as_str(), f.display_name.text.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![(0, "Off", "Off"), (1, "On", "On"), (5, "Auto", "Automatic")]
    );

    let Some(DataTypeDefinition::Structure(def)) = ns1.data_type_definition(&id(1, 3002)) else {
        panic!("Expected structure");
    };
    assert_eq!(def.structure_type, StructureType::Structure);
    assert_eq!(def.base_data_type, id(0, 22));
    assert_eq!(def.default_encoding_id, id(1, 5002));
    let fields: Vec<_> = def
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.data_type.clone()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("Count", id(0, 6)),
            ("Mode", id(1, 3001)),
            ("Enabled", id(0, 1))
        ]
    );
}

#[test]
fn find_by_browse_name() {
    let ns2 = nodeset2();
    assert_eq!(
        ns2.find_by_browse_name(NODESET2_URI, "TestMethod2"),
        Some(&id(1, 7001))
    );
    assert_eq!(ns2.find_by_browse_name(NODESET1_URI, "TestMethod2"), None);
    assert_eq!(ns2.find_by_browse_name("http://unknown.org/", "TestNode2"), None);
}
