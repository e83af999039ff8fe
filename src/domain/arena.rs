use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::cursor::Cursor;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Node, NodeRef};
use crate::domain::traversal::{BottomUp, Order, TopDown, Traversal};

/// Tree node stored in a [`TreeArena`].
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub value: f64,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in order
    pub children: Vec<Index>,
}

/// Arena-based tree: every node of one tree shares the arena's lifetime.
///
/// Traversals borrow the arena, so the borrow checker proves that all
/// reachable nodes outlive the iterator and no per-node bookkeeping is needed.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<ArenaNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Copy a reference-counted tree into a fresh arena, preserving child order.
    #[instrument(level = "debug", skip_all)]
    pub fn from_node(top: &NodeRef) -> Self {
        let mut tree = Self::new();
        let mut placed: HashMap<*const Node, Index> = HashMap::new();

        // Top-down order places every parent before its children.
        for node in top.top_down() {
            let parent = if Rc::ptr_eq(&node, top) {
                None
            } else {
                node.parent()
                    .and_then(|p| placed.get(&Rc::as_ptr(&p)).copied())
            };
            let idx = tree.insert_node(node.value(), parent);
            placed.insert(Rc::as_ptr(&node), idx);
        }
        debug!(nodes = tree.len(), "copied tree into arena");
        tree
    }

    /// Append a node as the last child of `parent`, or as the root.
    ///
    /// Inserting a second root replaces the first as the arena's root.
    pub fn insert_node(&mut self, value: f64, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            value,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ArenaNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Cursor at `idx`, if the arena holds it.
    pub fn cursor(&self, idx: Index) -> TreeResult<ArenaCursor<'_>> {
        if self.arena.contains(idx) {
            Ok(ArenaCursor { tree: self, idx })
        } else {
            Err(TreeError::MissingNode(format!("{idx:?}")))
        }
    }

    pub fn root_cursor(&self) -> Option<ArenaCursor<'_>> {
        self.root.map(|idx| ArenaCursor { tree: self, idx })
    }

    /// Bottom-up traversal from the root; empty for an empty arena.
    pub fn bottom_up(&self) -> impl Iterator<Item = ArenaCursor<'_>> {
        self.root_cursor().into_iter().flat_map(BottomUp::new)
    }

    /// Top-down traversal from the root; empty for an empty arena.
    pub fn top_down(&self) -> impl Iterator<Item = ArenaCursor<'_>> {
        self.root_cursor().into_iter().flat_map(TopDown::new)
    }

    pub fn subtree_bottom_up(&self, idx: Index) -> TreeResult<BottomUp<ArenaCursor<'_>>> {
        self.cursor(idx).map(BottomUp::new)
    }

    pub fn subtree_top_down(&self, idx: Index) -> TreeResult<TopDown<ArenaCursor<'_>>> {
        self.cursor(idx).map(TopDown::new)
    }

    pub fn traverse(&self, order: Order) -> impl Iterator<Item = ArenaCursor<'_>> {
        self.root_cursor()
            .into_iter()
            .flat_map(move |root| Traversal::new(root, order))
    }

    /// Number of levels, counted one level at a time; 0 for an empty arena.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut level: Vec<Index> = self.root.into_iter().collect();
        let mut depth = 0;
        while !level.is_empty() {
            depth += 1;
            level = level
                .iter()
                .filter_map(|&idx| self.get_node(idx))
                .flat_map(|node| node.children.iter().copied())
                .collect();
        }
        depth
    }

    /// Value plus the recursive sum of each child; 0 for an empty arena.
    pub fn recursive_sum(&self) -> f64 {
        self.root.map_or(0.0, |root| self.sum_from(root))
    }

    fn sum_from(&self, node_idx: Index) -> f64 {
        let node = &self.arena[node_idx];
        node.value
            + node
                .children
                .iter()
                .map(|&child| self.sum_from(child))
                .sum::<f64>()
    }
}

/// Borrowed handle to one node of a [`TreeArena`].
#[derive(Clone, Copy)]
pub struct ArenaCursor<'a> {
    tree: &'a TreeArena,
    idx: Index,
}

impl<'a> ArenaCursor<'a> {
    pub fn index(&self) -> Index {
        self.idx
    }

    pub fn node(&self) -> &'a ArenaNode {
        &self.tree.arena[self.idx]
    }

    pub fn value(&self) -> f64 {
        self.node().value
    }
}

impl fmt::Debug for ArenaCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaCursor")
            .field("idx", &self.idx)
            .field("value", &self.value())
            .finish()
    }
}

impl Cursor for ArenaCursor<'_> {
    fn parent(&self) -> Option<Self> {
        self.node().parent.map(|idx| ArenaCursor {
            tree: self.tree,
            idx,
        })
    }

    fn child_count(&self) -> usize {
        self.node().children.len()
    }

    fn child_at(&self, index: usize) -> Self {
        let children = &self.node().children;
        match children.get(index) {
            Some(&idx) => ArenaCursor {
                tree: self.tree,
                idx,
            },
            None => panic!(
                "{}",
                TreeError::IndexOutOfRange {
                    index,
                    len: children.len(),
                }
            ),
        }
    }

    fn position_in(&self, parent: &Self) -> usize {
        let siblings = &parent.node().children;
        match siblings.iter().position(|&idx| idx == self.idx) {
            Some(position) => position,
            None => panic!(
                "{}",
                TreeError::NotAChildOfParent {
                    siblings: siblings.len(),
                }
            ),
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        self.idx == other.idx && std::ptr::eq(self.tree, other.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_node_links_parent_and_children() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(1.0, None);
        let a = tree.insert_node(2.0, Some(root));
        let b = tree.insert_node(3.0, Some(root));

        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.get_node(root).unwrap().children, vec![a, b]);
        assert_eq!(tree.get_node(b).unwrap().parent, Some(root));
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_empty_arena_traversals_are_empty() {
        let tree = TreeArena::default();
        assert!(tree.is_empty());
        assert_eq!(tree.bottom_up().count(), 0);
        assert_eq!(tree.top_down().count(), 0);
        assert_eq!(tree.recursive_sum(), 0.0);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_from_node_preserves_order() {
        let root = Node::new(
            1.0,
            [Node::new(2.0, [Node::leaf(4.0)]), Node::leaf(3.0)],
        );
        let tree = TreeArena::from_node(&root);

        let up: Vec<f64> = tree.bottom_up().map(|c| c.value()).collect();
        let down: Vec<f64> = tree.top_down().map(|c| c.value()).collect();
        assert_eq!(up, vec![4.0, 2.0, 3.0, 1.0]);
        assert_eq!(down, vec![1.0, 2.0, 4.0, 3.0]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_cursor_rejects_foreign_index() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(1.0, None);
        let mut other = TreeArena::new();
        other.insert_node(0.0, None);
        let stale = other.insert_node(0.0, None);

        assert!(tree.cursor(root).is_ok());
        assert!(matches!(
            tree.cursor(stale),
            Err(TreeError::MissingNode(_))
        ));
    }
}
