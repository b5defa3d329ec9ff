#![warn(missing_docs)]

//! Raw XML schema for OPC UA NodeSet2 documents.
//!
//! Everything in [schema::ua_node_set] is a direct representation of the XML, with
//! identifiers kept as the strings found in the document. Turning these into
//! namespace-aware identifiers is left to the consumer, since it requires the alias
//! table and namespace array of the document.
//!
//! XML parsing is done with the `roxmltree` crate.

use ext::NodeExt;
use roxmltree::Node;

mod error;
mod ext;
pub mod schema;

pub use error::{XmlError, XmlErrorInner};
pub use schema::ua_node_set::load_nodeset2_file;

/// Trait for types that can be loaded from an XML node.
pub trait XmlLoad<'input>: Sized {
    /// Load Self from an XML node.
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError>;
}

/// Trait for types that can be loaded from an attribute value or node body.
pub trait FromValue: Sized {
    /// Load Self from the string `v`. `attr` and `node` are only used for context
    /// in error messages.
    fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XmlError>;
}

macro_rules! from_parse {
    ($($ty:ident),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(node: &Node<'_, '_>, attr: &str, v: &str) -> Result<Self, XmlError> {
                    v.trim()
                        .parse()
                        .map_err(|e| XmlError::invalid_value(node, attr, v, e))
                }
            }
        )*
    };
}

from_parse!(i64, i32, u32, u8, f64, bool);

impl FromValue for String {
    fn from_value(_node: &Node<'_, '_>, _attr: &str, v: &str) -> Result<Self, XmlError> {
        Ok(v.to_owned())
    }
}

impl<'input, T> XmlLoad<'input> for T
where
    T: FromValue + Default,
{
    fn load(node: &Node<'_, 'input>) -> Result<Self, XmlError> {
        T::from_value(node, "content", node.try_contents().unwrap_or_default())
    }
}
