//! Node store interface.

use crate::core::error::{Result, XtIndexError};
use crate::core::tree::{NodeId, NodeKind};

/// Source of node data for lazy navigation.
///
/// Every relation is resolved from a node id alone, so an
/// implementation never needs the whole document in memory.
/// Attributes hang off their element through
/// [`first_attribute`](NodeStore::first_attribute) and are chained
/// with [`next_sibling`](NodeStore::next_sibling); they are not
/// children, and their parent is the owning element.
pub trait NodeStore {
    /// Number of nodes, including the document node
    fn node_count(&self) -> usize;

    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind>;

    /// Element or attribute name, or processing-instruction target
    fn name(&self, node: NodeId) -> Result<Option<String>>;

    /// Character content of text, attribute, comment and
    /// processing-instruction nodes
    fn value(&self, node: NodeId) -> Result<Option<String>>;

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>>;

    fn first_child(&self, node: NodeId) -> Result<Option<NodeId>>;

    fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>>;

    fn first_attribute(&self, node: NodeId) -> Result<Option<NodeId>>;

    /// Previous sibling, found by replaying the parent's chain
    /// forward. Stores with a cheaper lookup may override this.
    fn prev_sibling(&self, node: NodeId) -> Result<Option<NodeId>> {
        let Some(parent) = self.parent(node)? else {
            return Ok(None);
        };

        let mut current = if self.kind(node)? == NodeKind::Attribute {
            self.first_attribute(parent)?
        } else {
            self.first_child(parent)?
        };

        let mut previous = None;
        while let Some(candidate) = current {
            if candidate == node {
                return Ok(previous);
            }
            previous = Some(candidate);
            current = self.next_sibling(candidate)?;
        }

        Err(XtIndexError::TreeError(format!(
            "Node {node} is not linked from its parent {parent}"
        )))
    }

    /// Text content: the node's own value, or for elements and the
    /// document the concatenated text of all descendants
    fn string_value(&self, node: NodeId) -> Result<String> {
        match self.kind(node)? {
            NodeKind::Element | NodeKind::Document => {
                let mut out = String::new();
                let mut current = self.first_child(node)?;
                while let Some(child) = current {
                    match self.kind(child)? {
                        NodeKind::Text => out.push_str(&self.value(child)?.unwrap_or_default()),
                        NodeKind::Element => out.push_str(&self.string_value(child)?),
                        _ => {}
                    }
                    current = self.next_sibling(child)?;
                }
                Ok(out)
            }
            _ => Ok(self.value(node)?.unwrap_or_default()),
        }
    }
}

impl<S: NodeStore + ?Sized> NodeStore for &S {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        (**self).kind(node)
    }

    fn name(&self, node: NodeId) -> Result<Option<String>> {
        (**self).name(node)
    }

    fn value(&self, node: NodeId) -> Result<Option<String>> {
        (**self).value(node)
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        (**self).parent(node)
    }

    fn first_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        (**self).first_child(node)
    }

    fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>> {
        (**self).next_sibling(node)
    }

    fn first_attribute(&self, node: NodeId) -> Result<Option<NodeId>> {
        (**self).first_attribute(node)
    }

    fn prev_sibling(&self, node: NodeId) -> Result<Option<NodeId>> {
        (**self).prev_sibling(node)
    }
}
