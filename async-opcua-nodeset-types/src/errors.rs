// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Errors raised when moving identifiers between namespace tables.

use thiserror::Error;

/// Error returned when an identifier cannot be remapped into a namespace table.
///
/// Both variants indicate malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemapError {
    /// An identifier carries a namespace index that does not exist in its own table.
    #[error("Namespace index {index} is out of range for a namespace table with {namespace_count} entries")]
    OutOfRangeNamespaceIndex {
        /// The offending namespace index.
        index: u16,
        /// Number of entries in the table the index was resolved against.
        namespace_count: usize,
    },
    /// A namespace URI is malformed, or the namespace table has no room left for it.
    #[error("Namespace URI {0:?} cannot be registered")]
    UnresolvableNamespaceUri(String),
}
