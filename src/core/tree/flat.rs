//! In-memory node store.

use std::collections::HashMap;

use crate::core::error::{Result, XtIndexError};
use crate::core::tree::{NodeId, NodeKind, NodeStore};

/// Sentinel for an absent link or string
pub(crate) const NONE: u32 = u32::MAX;

/// One node with its links, as stored in memory and on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeRecord {
    pub kind: NodeKind,
    pub parent: u32,
    pub first_child: u32,
    pub next_sibling: u32,
    pub first_attribute: u32,
    /// String table index
    pub name: u32,
    /// String table index
    pub value: u32,
}

impl NodeRecord {
    fn new(kind: NodeKind, parent: u32) -> Self {
        Self {
            kind,
            parent,
            first_child: NONE,
            next_sibling: NONE,
            first_attribute: NONE,
            name: NONE,
            value: NONE,
        }
    }
}

pub(crate) fn link(raw: u32) -> Option<NodeId> {
    (raw != NONE).then_some(NodeId(raw))
}

/// A fully materialized tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTree {
    pub(crate) nodes: Vec<NodeRecord>,
    pub(crate) strings: Vec<String>,
}

impl FlatTree {
    pub(crate) fn from_parts(nodes: Vec<NodeRecord>, strings: Vec<String>) -> Self {
        Self { nodes, strings }
    }

    fn record(&self, node: NodeId) -> Result<&NodeRecord> {
        self.nodes
            .get(node.index())
            .ok_or_else(|| XtIndexError::TreeError(format!("No node {node} in tree")))
    }

    fn string(&self, index: u32) -> Result<Option<String>> {
        if index == NONE {
            return Ok(None);
        }
        self.strings
            .get(index as usize)
            .cloned()
            .map(Some)
            .ok_or_else(|| XtIndexError::TreeError(format!("No string {index} in tree")))
    }

    /// Number of distinct strings
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }
}

impl NodeStore for FlatTree {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        Ok(self.record(node)?.kind)
    }

    fn name(&self, node: NodeId) -> Result<Option<String>> {
        self.string(self.record(node)?.name)
    }

    fn value(&self, node: NodeId) -> Result<Option<String>> {
        self.string(self.record(node)?.value)
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.parent))
    }

    fn first_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.first_child))
    }

    fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.next_sibling))
    }

    fn first_attribute(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.first_attribute))
    }
}

/// Builds a [`FlatTree`] from parse events in document order
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeRecord>,
    strings: Vec<String>,
    string_ids: HashMap<String, u32>,

    /// Open elements, innermost last
    open: Vec<u32>,

    /// Last child appended to each node
    last_child: HashMap<u32, u32>,

    /// Last attribute of the most recently started element
    last_attribute: Option<u32>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord::new(NodeKind::Document, NONE)],
            strings: Vec::new(),
            string_ids: HashMap::new(),
            open: vec![0],
            last_child: HashMap::new(),
            last_attribute: None,
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(id) = self.string_ids.get(s) {
            return *id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.string_ids.insert(s.to_string(), id);
        id
    }

    fn current(&self) -> u32 {
        self.open.last().copied().unwrap_or(0)
    }

    /// Depth of open elements (0 at document level)
    pub fn depth(&self) -> usize {
        self.open.len() - 1
    }

    fn push_child(&mut self, kind: NodeKind) -> u32 {
        let parent = self.current();
        let id = self.nodes.len() as u32;
        self.nodes.push(NodeRecord::new(kind, parent));

        match self.last_child.insert(parent, id) {
            Some(previous) => self.nodes[previous as usize].next_sibling = id,
            None => self.nodes[parent as usize].first_child = id,
        }
        self.last_attribute = None;
        id
    }

    pub fn start_element(&mut self, name: &str) {
        let id = self.push_child(NodeKind::Element);
        self.nodes[id as usize].name = self.intern(name);
        self.open.push(id);
    }

    /// Add an attribute to the element just started
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let owner = self.current();
        if self.nodes[owner as usize].kind != NodeKind::Element
            || self.nodes[owner as usize].first_child != NONE
        {
            return Err(XtIndexError::TreeError(format!(
                "Attribute '{name}' outside a start tag"
            )));
        }

        let id = self.nodes.len() as u32;
        let mut record = NodeRecord::new(NodeKind::Attribute, owner);
        record.name = self.intern(name);
        record.value = self.intern(value);
        self.nodes.push(record);

        match self.last_attribute {
            Some(previous) => self.nodes[previous as usize].next_sibling = id,
            None => self.nodes[owner as usize].first_attribute = id,
        }
        self.last_attribute = Some(id);
        Ok(())
    }

    /// Add character data; adjacent text is merged into one node
    pub fn text(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }

        let parent = self.current();
        if let Some(&last) = self.last_child.get(&parent) {
            let record = self.nodes[last as usize];
            if record.kind == NodeKind::Text {
                let merged = format!("{}{}", self.strings[record.value as usize], value);
                self.nodes[last as usize].value = self.intern(&merged);
                return;
            }
        }

        let id = self.push_child(NodeKind::Text);
        self.nodes[id as usize].value = self.intern(value);
    }

    pub fn comment(&mut self, value: &str) {
        let id = self.push_child(NodeKind::Comment);
        self.nodes[id as usize].value = self.intern(value);
    }

    pub fn processing_instruction(&mut self, target: &str, data: &str) {
        let id = self.push_child(NodeKind::ProcessingInstruction);
        self.nodes[id as usize].name = self.intern(target);
        self.nodes[id as usize].value = self.intern(data);
    }

    /// Close the innermost open element, which must be named `name`
    pub fn end_element(&mut self, name: &str) -> Result<()> {
        if self.open.len() < 2 {
            return Err(XtIndexError::TreeError(format!(
                "Unexpected end tag </{name}>"
            )));
        }
        let id = self.current();
        let open_name = &self.strings[self.nodes[id as usize].name as usize];
        if open_name != name {
            return Err(XtIndexError::TreeError(format!(
                "Mismatched end tag </{name}>, expected </{open_name}>"
            )));
        }
        self.open.pop();
        self.last_attribute = None;
        Ok(())
    }

    pub fn finish(self) -> Result<FlatTree> {
        if self.open.len() > 1 {
            let id = self.current();
            return Err(XtIndexError::TreeError(format!(
                "Unclosed element <{}>",
                self.strings[self.nodes[id as usize].name as usize]
            )));
        }

        let has_root_element = {
            let mut child = link(self.nodes[0].first_child);
            let mut found = false;
            while let Some(node) = child {
                let record = &self.nodes[node.index()];
                found |= record.kind == NodeKind::Element;
                child = link(record.next_sibling);
            }
            found
        };
        if !has_root_element {
            return Err(XtIndexError::TreeError(
                "Document has no root element".to_string(),
            ));
        }

        Ok(FlatTree::from_parts(self.nodes, self.strings))
    }
}
