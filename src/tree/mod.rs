//! Course content tree
//!
//! Nodes live in an arena owned by [`CourseTree`] and refer to their children
//! by [`NodeId`]. Every node has at most one parent. After construction the
//! shape is fixed; the only mutation is appending to a node's event log.

pub mod builder;

pub use builder::{BuildStats, CourseTreeBuilder};

use crate::location::Location;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

/// Index of a node inside its [`CourseTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One piece of course content
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub display_name: String,
    pub location: Location,
    pub depth: usize,
    /// Only the course root carries a start date
    pub start_date: Option<DateTime<FixedOffset>>,
    children: Vec<NodeId>,
    event_log: Vec<String>,
}

impl TreeNode {
    pub fn new(display_name: impl Into<String>, location: Location, depth: usize) -> Self {
        Self {
            display_name: display_name.into(),
            location,
            depth,
            start_date: None,
            children: Vec::new(),
            event_log: Vec::new(),
        }
    }

    pub fn with_start_date(mut self, start: Option<DateTime<FixedOffset>>) -> Self {
        self.start_date = start;
        self
    }

    pub fn category(&self) -> &str {
        self.location.category()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn event_log(&self) -> &[String] {
        &self.event_log
    }
}

/// Arena-backed forest of course nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    by_location: HashMap<Location, Vec<NodeId>>,
}

impl CourseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, node: TreeNode) -> NodeId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, node: TreeNode) -> NodeId {
        let id = self.insert(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn insert(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.by_location
            .entry(node.location.clone())
            .or_default()
            .push(id);
        self.nodes.push(node);
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, pre-order walk over every root in order
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// First node, depth-first, whose location equals `location`
    pub fn find_by_location(&self, location: &Location) -> Option<NodeId> {
        match self.by_location.get(location)?.as_slice() {
            [id] => Some(*id),
            // a location placed more than once needs the walk to pick the first
            _ => self
                .preorder()
                .find(|&id| self.node(id).location == *location),
        }
    }

    /// First node, depth-first, with the given category and display name
    pub fn find_by_name(&self, category: &str, display_name: &str) -> Option<NodeId> {
        self.preorder().find(|&id| {
            let node = self.node(id);
            node.category() == category && node.display_name == display_name
        })
    }

    /// First root with the given category and display name
    pub fn find_root_by_name(&self, category: &str, display_name: &str) -> Option<NodeId> {
        self.roots.iter().copied().find(|&id| {
            let node = self.node(id);
            node.category() == category && node.display_name == display_name
        })
    }

    pub fn append_event(&mut self, id: NodeId, line: String) {
        self.nodes[id.0].event_log.push(line);
    }

    /// Total number of event lines across all nodes
    pub fn event_count(&self) -> usize {
        self.nodes.iter().map(|n| n.event_log.len()).sum()
    }
}

/// Iterator returned by [`CourseTree::preorder`]
pub struct Preorder<'a> {
    tree: &'a CourseTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
