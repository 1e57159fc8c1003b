//! Lazy XML tree navigation.
//!
//! Nodes are plain value handles ([`NodeId`]) resolved against a
//! [`NodeStore`] on demand. A handle never owns its relations; the
//! parent, sibling and child links are looked up through the store
//! every time they are needed, so a store may keep the whole tree in
//! memory ([`FlatTree`]) or read one record at a time from disk
//! ([`TreeFile`]).
//!
//! Traversal happens one axis at a time through [`AxisEnumeration`],
//! which pairs a starting node, an [`Axis`] and a [`NodeTest`].
//!
//! # Node numbering
//!
//! Node ids follow document order. The document node is 0, and an
//! element's attributes are numbered directly after the element,
//! before its children.
//!
//! # Example
//!
//! ```
//! use xtindex::core::tree::{parse_xml, Axis, AxisEnumeration, NodeKind, NodeStore, NodeTest};
//!
//! let tree = parse_xml("<book><ch><p>one</p></ch></book>").unwrap();
//! let text = AxisEnumeration::new(&tree, Axis::Descendant, tree.root(), NodeTest::Kind(NodeKind::Text), false)
//!     .unwrap()
//!     .next()
//!     .unwrap()
//!     .unwrap();
//!
//! let names: Vec<String> = AxisEnumeration::new(&tree, Axis::Ancestor, text, NodeTest::Kind(NodeKind::Element), false)
//!     .unwrap()
//!     .map(|node| tree.name(node.unwrap()).unwrap().unwrap())
//!     .collect();
//! assert_eq!(names, vec!["p", "ch", "book"]);
//! ```

pub mod axis;
pub mod file;
pub mod flat;
pub mod store;
pub mod xml;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use axis::{Axis, AxisEnumeration};
pub use file::TreeFile;
pub use flat::{FlatTree, TreeBuilder};
pub use store::NodeStore;
pub use xml::parse_xml;

/// Handle to one node of a stored tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The document node
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of XML construct a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

impl NodeKind {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            NodeKind::Document => 0,
            NodeKind::Element => 1,
            NodeKind::Attribute => 2,
            NodeKind::Text => 3,
            NodeKind::Comment => 4,
            NodeKind::ProcessingInstruction => 5,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => NodeKind::Document,
            1 => NodeKind::Element,
            2 => NodeKind::Attribute,
            3 => NodeKind::Text,
            4 => NodeKind::Comment,
            5 => NodeKind::ProcessingInstruction,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Element => "element",
            NodeKind::Attribute => "attribute",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
            NodeKind::ProcessingInstruction => "processing-instruction",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = crate::core::error::XtIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" => Ok(NodeKind::Document),
            "element" => Ok(NodeKind::Element),
            "attribute" => Ok(NodeKind::Attribute),
            "text" => Ok(NodeKind::Text),
            "comment" => Ok(NodeKind::Comment),
            "processing-instruction" | "pi" => Ok(NodeKind::ProcessingInstruction),
            other => Err(crate::core::error::XtIndexError::TreeError(format!(
                "Unknown node kind '{other}'"
            ))),
        }
    }
}

/// Predicate selecting which nodes an enumeration yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// Every node
    Any,

    /// Nodes of one kind
    Kind(NodeKind),

    /// Nodes of one kind with the given name
    Name(NodeKind, String),
}

impl NodeTest {
    pub fn matches<S: NodeStore + ?Sized>(
        &self,
        store: &S,
        node: NodeId,
    ) -> crate::core::error::Result<bool> {
        match self {
            NodeTest::Any => Ok(true),
            NodeTest::Kind(kind) => Ok(store.kind(node)? == *kind),
            NodeTest::Name(kind, name) => {
                if store.kind(node)? != *kind {
                    return Ok(false);
                }
                Ok(store.name(node)?.as_deref() == Some(name.as_str()))
            }
        }
    }
}
