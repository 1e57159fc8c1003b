//! Axis enumeration.
//!
//! An [`AxisEnumeration`] walks one axis from a starting node and
//! yields the nodes that pass its [`NodeTest`]. Every axis shares
//! the same filtering, self-inclusion and restart policy; only the
//! step from one node to the next differs.
//!
//! The starting node is yielded first only when self-inclusion is
//! requested and it passes the test. Otherwise the cursor moves past
//! it before anything is yielded.
//!
//! Enumerations are finite and cannot be rewound in place.
//! [`AxisEnumeration::get_another`] builds a fresh, independent
//! cursor with the same start, axis and test.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, XtIndexError};
use crate::core::tree::{NodeId, NodeKind, NodeStore, NodeTest};

/// Tree traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    /// The starting node only
    #[serde(rename = "self")]
    SelfNode,
    Parent,
    Ancestor,
    Child,
    Descendant,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    Attribute,
}

impl Axis {
    pub const ALL: [Axis; 10] = [
        Axis::SelfNode,
        Axis::Parent,
        Axis::Ancestor,
        Axis::Child,
        Axis::Descendant,
        Axis::FollowingSibling,
        Axis::PrecedingSibling,
        Axis::Following,
        Axis::Preceding,
        Axis::Attribute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::SelfNode => "self",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Following => "following",
            Axis::Preceding => "preceding",
            Axis::Attribute => "attribute",
        }
    }

    /// Whether the axis yields nodes in reverse document order
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent | Axis::Ancestor | Axis::PrecedingSibling | Axis::Preceding
        )
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = XtIndexError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_ascii_lowercase();
        Axis::ALL
            .into_iter()
            .find(|axis| axis.as_str() == wanted)
            .ok_or_else(|| XtIndexError::TreeError(format!("Unknown axis '{s}'")))
    }
}

/// Lazy, filtered cursor over one axis of a node store
pub struct AxisEnumeration<'s, S: NodeStore + ?Sized> {
    store: &'s S,
    axis: Axis,
    start: NodeId,
    test: NodeTest,
    include_self: bool,

    /// Next node to yield; it has already passed the test
    current: Option<NodeId>,

    /// Error hit while looking ahead, yielded after `current`
    error: Option<XtIndexError>,

    /// Preceding-axis nodes in document order, consumed from the back
    replay: Option<Vec<NodeId>>,
}

impl<S: NodeStore + ?Sized> fmt::Debug for AxisEnumeration<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisEnumeration")
            .field("axis", &self.axis)
            .field("start", &self.start)
            .field("test", &self.test)
            .field("include_self", &self.include_self)
            .field("current", &self.current)
            .finish()
    }
}

impl<'s, S: NodeStore + ?Sized> AxisEnumeration<'s, S> {
    /// Position a new cursor on the first node to yield.
    ///
    /// # Errors
    ///
    /// Fails if `start` does not exist in the store or the store
    /// fails while finding the first node.
    pub fn new(
        store: &'s S,
        axis: Axis,
        start: NodeId,
        test: NodeTest,
        include_self: bool,
    ) -> Result<Self> {
        let mut enumeration = Self {
            store,
            axis,
            start,
            test,
            include_self,
            current: None,
            error: None,
            replay: None,
        };

        enumeration.current = if include_self && enumeration.test.matches(store, start)? {
            Some(start)
        } else {
            enumeration.advance(start)?
        };

        Ok(enumeration)
    }

    /// A fresh cursor equivalent to this one at construction
    pub fn get_another(&self) -> Result<Self> {
        Self::new(
            self.store,
            self.axis,
            self.start,
            self.test.clone(),
            self.include_self,
        )
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Whether another item (node or error) remains
    pub fn has_more(&self) -> bool {
        self.current.is_some() || self.error.is_some()
    }

    /// Step until a node passes the test or the axis ends
    fn advance(&mut self, from: NodeId) -> Result<Option<NodeId>> {
        let mut node = from;
        while let Some(next) = self.step(node)? {
            if self.test.matches(self.store, next)? {
                return Ok(Some(next));
            }
            node = next;
        }
        Ok(None)
    }

    /// The node after `node` on this axis, ignoring the test
    fn step(&mut self, node: NodeId) -> Result<Option<NodeId>> {
        let store = self.store;
        let start = self.start;

        match self.axis {
            Axis::SelfNode => Ok(None),

            Axis::Parent => {
                if node == start {
                    store.parent(node)
                } else {
                    Ok(None)
                }
            }

            Axis::Ancestor => store.parent(node),

            Axis::Child => {
                if node == start {
                    store.first_child(node)
                } else {
                    store.next_sibling(node)
                }
            }

            Axis::Descendant => {
                if let Some(child) = store.first_child(node)? {
                    return Ok(Some(child));
                }
                next_outside(store, node, Some(start))
            }

            Axis::FollowingSibling => {
                if node == start && store.kind(start)? == NodeKind::Attribute {
                    return Ok(None);
                }
                store.next_sibling(node)
            }

            Axis::PrecedingSibling => {
                if node == start && store.kind(start)? == NodeKind::Attribute {
                    return Ok(None);
                }
                store.prev_sibling(node)
            }

            Axis::Following => {
                if node != start {
                    if let Some(child) = store.first_child(node)? {
                        return Ok(Some(child));
                    }
                    return next_outside(store, node, None);
                }
                if store.kind(start)? == NodeKind::Attribute {
                    // An attribute is followed by its element's content
                    let Some(owner) = store.parent(start)? else {
                        return Ok(None);
                    };
                    if let Some(child) = store.first_child(owner)? {
                        return Ok(Some(child));
                    }
                    return next_outside(store, owner, None);
                }
                next_outside(store, start, None)
            }

            Axis::Preceding => {
                if self.replay.is_none() {
                    self.replay = Some(preceding_in_document_order(store, start)?);
                }
                Ok(self.replay.as_mut().and_then(Vec::pop))
            }

            Axis::Attribute => {
                if node == start {
                    store.first_attribute(node)
                } else {
                    store.next_sibling(node)
                }
            }
        }
    }
}

/// Next node in document order that is not inside `node`'s subtree,
/// without leaving `bound`'s subtree
fn next_outside<S: NodeStore + ?Sized>(
    store: &S,
    node: NodeId,
    bound: Option<NodeId>,
) -> Result<Option<NodeId>> {
    let mut current = node;
    loop {
        if Some(current) == bound {
            return Ok(None);
        }
        if let Some(sibling) = store.next_sibling(current)? {
            return Ok(Some(sibling));
        }
        match store.parent(current)? {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
}

/// Nodes before `start` in document order, excluding its ancestors
/// and all attributes. Built by replaying a forward walk from the
/// root up to `start`.
fn preceding_in_document_order<S: NodeStore + ?Sized>(
    store: &S,
    start: NodeId,
) -> Result<Vec<NodeId>> {
    let anchor = if store.kind(start)? == NodeKind::Attribute {
        store.parent(start)?.unwrap_or(start)
    } else {
        start
    };

    let mut ancestors = Vec::new();
    let mut cursor = store.parent(anchor)?;
    while let Some(node) = cursor {
        ancestors.push(node);
        cursor = store.parent(node)?;
    }

    let mut nodes = Vec::new();
    let root = store.root();
    let mut node = root;
    loop {
        if node == anchor {
            break;
        }
        if !ancestors.contains(&node) {
            nodes.push(node);
        }
        node = match store.first_child(node)? {
            Some(child) => child,
            None => match next_outside(store, node, None)? {
                Some(next) => next,
                None => break,
            },
        };
    }

    Ok(nodes)
}

impl<S: NodeStore + ?Sized> Iterator for AxisEnumeration<'_, S> {
    type Item = Result<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(node) = self.current.take() else {
            return self.error.take().map(Err);
        };

        match self.advance(node) {
            Ok(next) => self.current = next,
            Err(e) => self.error = Some(e),
        }
        Some(Ok(node))
    }
}
