use opcua_nodeset::{
    CollisionPolicy, Config, ConfigError, MergeConfig, MergeOptions, NodeSet2Loader,
    UaNodeSetMerger,
};

use crate::utils::{resource_dir, setup, NODESET1_URI, NODESET2_URI, NODESET3_URI};

#[test]
fn compose_from_config() {
    setup();
    let root = resource_dir();
    let config = MergeConfig::load::<MergeConfig>(&root.join("compose.yml")).unwrap();
    assert_eq!(
        config.node_sets,
        vec!["nodeset1.xml", "nodeset2.xml", "nodeset3.xml"]
    );
    assert_eq!(config.preferred_locale, "de");
    assert_eq!(config.collision_policy, CollisionPolicy::Reject);

    let composed = config.compose(&root).unwrap();

    let loader = NodeSet2Loader::new("de");
    let inputs: Vec<_> = config
        .node_sets
        .iter()
        .map(|f| loader.load_file(root.join(f)).unwrap())
        .collect();
    let options = MergeOptions {
        collision_policy: CollisionPolicy::Reject,
    };
    let chained = UaNodeSetMerger::merge_with_options(&inputs[0], &inputs[1], &options).unwrap();
    let chained = UaNodeSetMerger::merge_with_options(&chained, &inputs[2], &options).unwrap();
    assert_eq!(composed, chained);

    assert_eq!(composed.namespaces().get_index(NODESET1_URI), Some(1));
    assert_eq!(composed.namespaces().get_index(NODESET2_URI), Some(2));
    assert_eq!(composed.namespaces().get_index(NODESET3_URI), Some(3));
    let method = composed
        .node(&opcua_nodeset::types::NodeId::new(2, 7001u32))
        .unwrap();
    assert_eq!(method.display_name.text, "TestMethode2");
}

#[test]
fn compose_missing_file() {
    setup();
    let config = MergeConfig::new(["nodeset1.xml", "missing.xml"]);
    let err = config.compose(&resource_dir()).unwrap_err();
    let ConfigError::Load(file, _) = err else {
        panic!("Expected load error, got {err}");
    };
    assert_eq!(file, "missing.xml");
}

#[test]
fn compose_invalid_config() {
    let err = MergeConfig::new(Vec::<String>::new())
        .compose(&resource_dir())
        .unwrap_err();
    assert!(matches!(err, ConfigError::ConfigInvalid(e) if e.len() == 1));
}

#[test]
fn save_and_load_config() {
    let dir = std::env::temp_dir().join(format!("opcua-nodeset-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("compose.yml");

    let mut config = MergeConfig::new(["a.xml", "b.xml"]);
    config.collision_policy = CollisionPolicy::KeepFirst;
    config.save(&path).unwrap();
    let loaded = MergeConfig::load::<MergeConfig>(&path).unwrap();
    assert_eq!(loaded, config);

    let invalid = MergeConfig::new([""]);
    assert!(matches!(
        invalid.save(&dir.join("invalid.yml")),
        Err(ConfigError::ConfigInvalid(_))
    ));
    assert!(!dir.join("invalid.yml").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
