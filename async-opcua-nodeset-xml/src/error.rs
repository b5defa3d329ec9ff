use std::{fmt::Display, ops::Range};

use roxmltree::Node;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
/// What went wrong while loading an XML document.
pub enum XmlErrorInner {
    #[error("Failed to load XML: {0}")]
    /// The document is not well formed XML.
    Xml(#[from] roxmltree::Error),
    #[error("Expected child: {0}")]
    /// Required child element was missing.
    MissingField(String),
    #[error("Expected attribute: {0}")]
    /// Required attribute was missing.
    MissingAttribute(String),
    #[error("Missing node content")]
    /// Element has no text content.
    MissingContent,
    #[error("Invalid value {value:?} for {attr}: {message}")]
    /// An attribute or element body could not be parsed.
    InvalidValue {
        /// Name of the attribute, or `content` for element bodies.
        attr: String,
        /// The text that failed to parse.
        value: String,
        /// Parser error message.
        message: String,
    },
}

#[derive(Error, Debug, Clone)]
#[error("{error} at {span:?}")]
/// Error returned from loading an XML document.
pub struct XmlError {
    /// Byte range in the document of the element that caused the issue.
    pub span: Range<usize>,
    /// The inner error variant.
    pub error: XmlErrorInner,
}

impl From<roxmltree::Error> for XmlError {
    fn from(value: roxmltree::Error) -> Self {
        Self {
            span: 0..0,
            error: XmlErrorInner::Xml(value),
        }
    }
}

impl XmlError {
    fn at(node: &Node<'_, '_>, error: XmlErrorInner) -> Self {
        Self {
            span: node.range(),
            error,
        }
    }

    /// Create an error for a node with a missing child element `name`.
    pub fn missing_field(node: &Node<'_, '_>, name: &str) -> Self {
        Self::at(node, XmlErrorInner::MissingField(name.to_owned()))
    }

    /// Create an error for a node with a missing attribute `name`.
    pub fn missing_attribute(node: &Node<'_, '_>, name: &str) -> Self {
        Self::at(node, XmlErrorInner::MissingAttribute(name.to_owned()))
    }

    /// Create an error indicating that `node` does not have the necessary content.
    pub fn missing_content(node: &Node<'_, '_>) -> Self {
        Self::at(node, XmlErrorInner::MissingContent)
    }

    /// Create an error for failing to parse `value`, found in `attr` of `node`.
    pub fn invalid_value(node: &Node<'_, '_>, attr: &str, value: &str, err: impl Display) -> Self {
        Self::at(
            node,
            XmlErrorInner::InvalidValue {
                attr: attr.to_owned(),
                value: value.to_owned(),
                message: err.to_string(),
            },
        )
    }
}
