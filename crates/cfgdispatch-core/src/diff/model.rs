//! Diff tree types.
//!
//! A [`DiffTree`] is built fresh for each configuration-change event by a
//! [`DiffSource`](crate::diff::source::DiffSource), annotated in place by a
//! [`PriorityAssigner`](crate::priority::PriorityAssigner), consumed by one
//! dispatch and then dropped.
//!
//! The element carried by each node is opaque to this crate: it is a type
//! parameter `E` that the dispatcher only ever hands to callbacks by shared
//! reference.

use serde::{Deserialize, Serialize};

/// Kind of change detected for a configuration element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Element is present in the new document only
    Add,
    /// Element is present in the old document only
    Remove,
    /// Element is present in both documents with different content
    Modify,
}

impl Operation {
    /// Stable lowercase name, as used in logs and serialized trees
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::Modify => "modify",
        }
    }

    /// Single-character marker used by the tree summary
    pub fn marker(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Remove => '-',
            Operation::Modify => '~',
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element-level change entry within a [`DiffTree`].
///
/// `priority` and `applied` are private: priorities are attached through
/// [`DiffNode::set_priority`] by an assigner, and the applied flag is only
/// ever flipped by the dispatcher, at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffNode<E> {
    /// Identifying path of the changed element, used for callback lookup
    pub path: String,
    /// Change kind
    pub operation: Operation,
    /// Opaque reference to the affected element
    pub element: E,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    applied: bool,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    children: Vec<DiffNode<E>>,
}

impl<E> DiffNode<E> {
    /// Create an unprioritised, unapplied leaf node
    pub fn new(path: impl Into<String>, operation: Operation, element: E) -> Self {
        Self {
            path: path.into(),
            operation,
            element,
            priority: None,
            applied: false,
            children: Vec::new(),
        }
    }

    /// Builder: attach a priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: DiffNode<E>) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append several children, keeping their order
    pub fn with_children(mut self, children: impl IntoIterator<Item = DiffNode<E>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Raw priority as attached, including an explicit zero
    pub fn priority(&self) -> Option<u32> {
        self.priority
    }

    /// Priority if the node is eligible for dispatch (attached and > 0)
    pub fn dispatch_priority(&self) -> Option<u32> {
        self.priority.filter(|p| *p > 0)
    }

    /// Attach or replace the priority
    pub fn set_priority(&mut self, priority: u32) {
        self.priority = Some(priority);
    }

    /// Whether the dispatcher has already handled this node
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Flip the applied flag. Returns false if it was already set.
    pub(crate) fn mark_applied(&mut self) -> bool {
        !std::mem::replace(&mut self.applied, true)
    }

    /// Whether this node is still waiting to be picked by its parent
    pub fn is_pending(&self) -> bool {
        !self.applied && self.dispatch_priority().is_some()
    }

    /// Child nodes in diff order
    pub fn children(&self) -> &[DiffNode<E>] {
        &self.children
    }

    /// Mutable access to children, for assigners walking the tree
    pub fn children_mut(&mut self) -> &mut [DiffNode<E>] {
        &mut self.children
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(DiffNode::subtree_len).sum::<usize>()
    }

    /// Pre-order visit of this subtree
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a DiffNode<E>)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Pre-order mutable visit of this subtree
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut DiffNode<E>)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

/// Tree of differences between two configuration document revisions.
///
/// The root is implicit: `entries` are the top-level changes and the root
/// itself never carries an element or a priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffTree<E> {
    /// Top-level change entries, in diff order
    pub entries: Vec<DiffNode<E>>,
}

impl<E> DiffTree<E> {
    /// Path reported for the implicit root
    pub const ROOT_PATH: &'static str = "/";

    /// Build a tree from its top-level entries
    pub fn from_entries(entries: Vec<DiffNode<E>>) -> Self {
        Self { entries }
    }

    /// True when the diff holds no change at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of diff nodes (the implicit root is not counted)
    pub fn node_count(&self) -> usize {
        self.entries.iter().map(DiffNode::subtree_len).sum()
    }

    /// True if any node anywhere in the tree carries a priority > 0
    pub fn has_dispatchable(&self) -> bool {
        let mut found = false;
        self.visit(&mut |node| found |= node.dispatch_priority().is_some());
        found
    }

    /// True if the implicit root still has a top-level entry to pick
    pub fn has_pending_entry(&self) -> bool {
        self.entries.iter().any(DiffNode::is_pending)
    }

    /// Paths of applied nodes, in pre-order
    pub fn applied_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.visit(&mut |node| {
            if node.is_applied() {
                out.push(node.path.as_str());
            }
        });
        out
    }

    /// Paths of dispatchable nodes the walk has not reached, in pre-order
    pub fn pending_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.visit(&mut |node| {
            if node.is_pending() {
                out.push(node.path.as_str());
            }
        });
        out
    }

    /// Pre-order visit of every node
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a DiffNode<E>)) {
        for entry in &self.entries {
            entry.visit(f);
        }
    }

    /// Pre-order mutable visit of every node
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut DiffNode<E>)) {
        for entry in &mut self.entries {
            entry.visit_mut(f);
        }
    }
}

impl<E> Default for DiffTree<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}
