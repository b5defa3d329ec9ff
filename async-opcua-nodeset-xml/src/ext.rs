use roxmltree::Node;

use crate::{error::XmlError, FromValue, XmlLoad};

/// Lookup helpers on `roxmltree` nodes, returning [`XmlError`] with the span of the
/// offending element instead of `None`.
pub trait NodeExt<'a, 'input: 'a> {
    fn first_child_with_name(&self, name: &str) -> Result<Node<'a, 'input>, XmlError>;

    fn with_name(&self, name: &str) -> impl Iterator<Item = Node<'a, 'input>>;

    fn try_attribute(&self, name: &str) -> Result<&'a str, XmlError>;

    fn try_contents(&self) -> Result<&'a str, XmlError>;
}

impl<'a, 'input: 'a> NodeExt<'a, 'input> for Node<'a, 'input> {
    fn first_child_with_name(&self, name: &str) -> Result<Node<'a, 'input>, XmlError> {
        self.with_name(name)
            .next()
            .ok_or_else(|| XmlError::missing_field(self, name))
    }

    fn with_name(&self, name: &str) -> impl Iterator<Item = Node<'a, 'input>> {
        // Match on local name only, NodeSet2 files are not consistent about prefixes.
        self.children()
            .filter(move |n| n.is_element() && n.tag_name().name() == name)
    }

    fn try_attribute(&self, name: &str) -> Result<&'a str, XmlError> {
        self.attribute(name)
            .ok_or_else(|| XmlError::missing_attribute(self, name))
    }

    fn try_contents(&self) -> Result<&'a str, XmlError> {
        self.text().ok_or_else(|| XmlError::missing_content(self))
    }
}

pub fn children_with_name<'input, T: XmlLoad<'input>>(
    node: &Node<'_, 'input>,
    name: &str,
) -> Result<Vec<T>, XmlError> {
    node.with_name(name).map(|e| T::load(&e)).collect()
}

pub fn first_child_with_name_opt<'input, T: XmlLoad<'input>>(
    node: &Node<'_, 'input>,
    name: &str,
) -> Result<Option<T>, XmlError> {
    let Ok(child) = node.first_child_with_name(name) else {
        return Ok(None);
    };
    T::load(&child).map(Some)
}

pub fn value_from_attr<T: FromValue>(node: &Node<'_, '_>, attr: &str) -> Result<T, XmlError> {
    T::from_value(node, attr, node.try_attribute(attr)?)
}

pub fn value_from_attr_opt<T: FromValue>(
    node: &Node<'_, '_>,
    attr: &str,
) -> Result<Option<T>, XmlError> {
    node.attribute(attr)
        .map(|v| T::from_value(node, attr, v))
        .transpose()
}

pub fn value_from_contents<T: FromValue>(node: &Node<'_, '_>) -> Result<T, XmlError> {
    T::from_value(node, "content", node.try_contents()?.trim())
}
