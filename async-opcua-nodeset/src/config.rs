// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! YAML description of a node set composition.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

#[cfg(feature = "xml")]
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{CollisionPolicy, MergeError, MergeOptions};
#[cfg(feature = "xml")]
use crate::{NodeSet2Loader, UaNodeSet, UaNodeSetMerger};

/// Error returned from saving, loading or composing config objects.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Configuration is invalid, with a list of validation errors.
    #[error("Invalid configuration: {}", .0.join(", "))]
    ConfigInvalid(Vec<String>),
    /// Reading or writing a file failed.
    #[error("{0}")]
    IO(#[from] std::io::Error),
    /// Failed to serialize or deserialize the config object.
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    /// One of the listed node sets failed to load.
    #[error("Failed to load node set {0}: {1}")]
    Load(String, #[source] Box<dyn std::error::Error + Send + Sync>),
    /// The node sets could not be merged.
    #[error("{0}")]
    Merge(#[from] MergeError),
}

/// A trait that handles loading, saving and validation of configuration files.
pub trait Config: Serialize {
    /// Save the configuration object to a file.
    fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Err(e) = self.validate() {
            return Err(ConfigError::ConfigInvalid(e));
        }
        let s = serde_yaml::to_string(&self)?;
        let mut f = File::create(path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Load the configuration object from the given path.
    fn load<A>(path: &Path) -> Result<A, ConfigError>
    where
        for<'de> A: Config + Deserialize<'de>,
    {
        let mut f = File::open(path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate the config struct, returning a list of validation errors if it fails.
    fn validate(&self) -> Result<(), Vec<String>>;
}

/// Composition of several NodeSet2 files into one node set.
///
/// ```yaml
/// node_sets:
///   - Opc.Ua.Di.NodeSet2.xml
///   - Opc.Ua.Machinery.NodeSet2.xml
/// preferred_locale: en
/// collision_policy: keep-first
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Paths to node set files, relative to the directory of the config file.
    /// They are merged from left to right.
    pub node_sets: Vec<String>,
    /// Locale to prefer when a node has display names in several locales.
    #[serde(default)]
    pub preferred_locale: String,
    /// What to do when two node sets define the same node differently.
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

impl Config for MergeConfig {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.node_sets.is_empty() {
            errors.push("No node sets listed".to_owned());
        }
        for (idx, path) in self.node_sets.iter().enumerate() {
            if path.trim().is_empty() {
                errors.push(format!("Node set path at position {idx} is empty"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl MergeConfig {
    /// Create a config merging the given files with default options.
    pub fn new(node_sets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            node_sets: node_sets.into_iter().map(Into::into).collect(),
            preferred_locale: String::new(),
            collision_policy: CollisionPolicy::default(),
        }
    }

    /// Options passed to the merger.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            collision_policy: self.collision_policy,
        }
    }

    /// Load every listed node set, resolving paths against `root`, and merge them in
    /// the order they are listed.
    #[cfg(feature = "xml")]
    pub fn compose(&self, root: &Path) -> Result<UaNodeSet, ConfigError> {
        if let Err(e) = self.validate() {
            return Err(ConfigError::ConfigInvalid(e));
        }
        let loader = NodeSet2Loader::new(&self.preferred_locale);
        let mut node_sets = Vec::with_capacity(self.node_sets.len());
        for file in &self.node_sets {
            let path = root.join(file);
            debug!("Loading {}", path.display());
            let node_set = loader
                .load_file(&path)
                .map_err(|e| ConfigError::Load(file.clone(), Box::new(e)))?;
            node_sets.push(node_set);
        }
        let result = UaNodeSetMerger::merge_all(&node_sets, &self.merge_options())?;
        info!(
            "Composed {} node sets into {} nodes in {} namespaces",
            node_sets.len(),
            result.nodes().len(),
            result.namespaces().len()
        );
        Ok(result)
    }
}
