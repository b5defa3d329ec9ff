// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the definition of `QualifiedName`.

use std::{fmt, str::FromStr};

/// A name qualified by a namespace index. This is the type of a node's browse name.
#[derive(PartialEq, Debug, Clone, Eq, Hash, Default)]
pub struct QualifiedName {
    /// The namespace index
    pub namespace_index: u16,
    /// The name.
    pub name: String,
}

impl QualifiedName {
    /// Create a new qualified name from namespace index and name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> QualifiedName {
        QualifiedName {
            namespace_index,
            name: name.into(),
        }
    }

    /// Test if the qualified name is null, i.e. has an empty name in namespace 0.
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.name.is_empty()
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self::new(0, value)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index > 0 {
            write!(f, "{}:", self.namespace_index)?;
        }
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid qualified name: {0}")]
/// Error returned when a qualified name cannot be parsed from its string form.
pub struct QualifiedNameError(pub String);

impl FromStr for QualifiedName {
    type Err = QualifiedNameError;

    /// Parse a qualified name on the form `[<namespace>:]<name>`, as used for browse
    /// names in NodeSet2 files. A prefix that is not a number is part of the name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((ns, name)) if !ns.is_empty() && ns.bytes().all(|b| b.is_ascii_digit()) => {
                let namespace_index = ns
                    .parse::<u16>()
                    .map_err(|_| QualifiedNameError(s.to_owned()))?;
                Ok(Self::new(namespace_index, name))
            }
            _ => Ok(Self::new(0, s)),
        }
    }
}
