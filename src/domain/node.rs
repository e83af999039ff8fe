//! Reference-counted tree node with a weak parent back-reference.
//!
//! A node owns its children (`Rc`), a child points back at its parent through
//! a `Weak` that never extends the parent's lifetime.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::instrument;

use crate::domain::cursor::Cursor;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::traversal::{BottomUp, Order, TopDown, Traversal};

/// Owning handle to a node.
pub type NodeRef = Rc<Node>;

/// Tree vertex: a numeric value and an ordered sequence of owned children.
pub struct Node {
    value: Cell<f64>,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<NodeRef>>,
}

impl Node {
    /// Create a node that takes ownership of `children`, in order.
    ///
    /// Every child's back-reference is pointed at the new node.
    pub fn new(value: f64, children: impl IntoIterator<Item = NodeRef>) -> NodeRef {
        let children: Vec<NodeRef> = children.into_iter().collect();
        debug_assert!(
            children.iter().map(Rc::as_ptr).collect::<HashSet<_>>().len() == children.len(),
            "the same node was given twice as a child"
        );
        Rc::new_cyclic(|this| {
            for child in &children {
                child.adopt(this);
            }
            Node {
                value: Cell::new(value),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(children),
            }
        })
    }

    pub fn leaf(value: f64) -> NodeRef {
        Self::new(value, [])
    }

    fn adopt(&self, parent: &Weak<Node>) {
        debug_assert!(
            self.parent.borrow().upgrade().is_none(),
            "node already has a live parent"
        );
        *self.parent.borrow_mut() = parent.clone();
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn set_value(&self, value: f64) {
        self.value.set(value);
    }

    /// The owning node, `None` for a root or once the parent has been released.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.borrow().is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Borrowed view of the children, in order.
    pub fn children(&self) -> Ref<'_, [NodeRef]> {
        Ref::map(self.children.borrow(), Vec::as_slice)
    }

    /// Child at `index`.
    ///
    /// # Panics
    /// If `index` is not in `0..child_count()`.
    pub fn child_at(&self, index: usize) -> NodeRef {
        self.try_child_at(index).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_child_at(&self, index: usize) -> TreeResult<NodeRef> {
        let children = self.children.borrow();
        children
            .get(index)
            .cloned()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    /// Position among the parent's children, compared by identity.
    ///
    /// `None` if this node has no parent.
    ///
    /// # Panics
    /// If the parent does not own this node.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.try_index_in_parent().unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_index_in_parent(&self) -> TreeResult<Option<usize>> {
        match self.parent() {
            None => Ok(None),
            Some(parent) => parent.index_of(self).map(Some),
        }
    }

    fn index_of(&self, child: &Node) -> TreeResult<usize> {
        let children = self.children.borrow();
        children
            .iter()
            .position(|c| std::ptr::eq(Rc::as_ptr(c), child))
            .ok_or(TreeError::NotAChildOfParent {
                siblings: children.len(),
            })
    }

    /// Replace all children at once.
    ///
    /// The previous children are detached (their back-reference is cleared),
    /// the new ones point at `self`.
    #[instrument(level = "trace", skip_all)]
    pub fn set_children(self: &Rc<Self>, children: impl IntoIterator<Item = NodeRef>) {
        let children: Vec<NodeRef> = children.into_iter().collect();
        for old in self.children.borrow().iter() {
            *old.parent.borrow_mut() = Weak::new();
        }
        let this = Rc::downgrade(self);
        for child in &children {
            child.adopt(&this);
        }
        *self.children.borrow_mut() = children;
    }

    pub fn leftmost_descendant(self: &Rc<Self>) -> NodeRef {
        Cursor::leftmost_descendant(self)
    }

    pub fn rightmost_descendant(self: &Rc<Self>) -> NodeRef {
        Cursor::rightmost_descendant(self)
    }

    /// Indices from the root down to this node; empty for a root.
    pub fn path(self: &Rc<Self>) -> Vec<usize> {
        Cursor::path(self)
    }

    /// Number of nodes on the longest root-to-leaf path of this subtree.
    pub fn depth(&self) -> usize {
        let mut level: Vec<NodeRef> = self.children().to_vec();
        let mut depth = 1;
        while !level.is_empty() {
            depth += 1;
            level = level
                .iter()
                .flat_map(|node| node.children().to_vec())
                .collect();
        }
        depth
    }

    pub fn node_count(self: &Rc<Self>) -> usize {
        self.bottom_up().count()
    }

    /// Bottom-up traversal of this subtree, one `Rc` clone per step.
    pub fn bottom_up(self: &Rc<Self>) -> BottomUp<NodeRef> {
        BottomUp::new(Rc::clone(self))
    }

    /// Top-down traversal of this subtree, one `Rc` clone per step.
    pub fn top_down(self: &Rc<Self>) -> TopDown<NodeRef> {
        TopDown::new(Rc::clone(self))
    }

    pub fn traverse(self: &Rc<Self>, order: Order) -> Traversal<NodeRef> {
        Traversal::new(Rc::clone(self), order)
    }

    /// Value plus the recursive sum of each child, value first.
    pub fn recursive_sum(&self) -> f64 {
        let mut sum = self.value();
        for child in self.children.borrow().iter() {
            sum += child.recursive_sum();
        }
        sum
    }

    /// Children first, then the value.
    pub fn recursive_bottom_up_sum(&self) -> f64 {
        let mut sum = 0.0;
        for child in self.children.borrow().iter() {
            sum += child.recursive_bottom_up_sum();
        }
        sum + self.value()
    }

    /// Parent address without touching its reference count.
    pub(crate) fn parent_unretained(&self) -> Option<*const Node> {
        let parent = self.parent.borrow();
        (parent.strong_count() > 0).then(|| parent.as_ptr())
    }

    /// Child address without touching its reference count.
    pub(crate) fn child_unretained(&self, index: usize) -> *const Node {
        let children = self.children.borrow();
        match children.get(index) {
            Some(child) => Rc::as_ptr(child),
            None => panic!(
                "{}",
                TreeError::IndexOutOfRange {
                    index,
                    len: children.len(),
                }
            ),
        }
    }

    pub(crate) fn child_index(&self, child: &Node) -> usize {
        self.index_of(child).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Drop for Node {
    // Release descendants iteratively so very deep trees cannot overflow the stack.
    fn drop(&mut self) {
        let mut pending = std::mem::take(self.children.get_mut());
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child) {
                pending.append(node.children.get_mut());
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value())
            .field("root", &self.is_root())
            .field("children", &*self.children.borrow())
            .finish()
    }
}

impl Cursor for NodeRef {
    fn parent(&self) -> Option<Self> {
        Node::parent(self)
    }

    fn child_count(&self) -> usize {
        Node::child_count(self)
    }

    fn child_at(&self, index: usize) -> Self {
        Node::child_at(self, index)
    }

    fn position_in(&self, parent: &Self) -> usize {
        parent.child_index(self)
    }

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(iter: impl Iterator<Item = NodeRef>) -> Vec<f64> {
        iter.map(|n| n.value()).collect()
    }

    #[test]
    fn test_constructor_sets_back_references() {
        let root = Node::new(1.0, [Node::leaf(2.0), Node::leaf(3.0)]);
        for child in root.children().iter() {
            assert!(Rc::ptr_eq(&child.parent().unwrap(), &root));
        }
        assert!(root.is_root());
    }

    #[test]
    fn test_leftmost_and_rightmost_of_leaf_is_self() {
        let leaf = Node::leaf(7.0);
        assert!(Rc::ptr_eq(&leaf.leftmost_descendant(), &leaf));
        assert!(Rc::ptr_eq(&leaf.rightmost_descendant(), &leaf));
    }

    #[test]
    fn test_set_children_detaches_old_children() {
        let old = Node::leaf(2.0);
        let root = Node::new(1.0, [Rc::clone(&old)]);
        let new = Node::leaf(3.0);
        root.set_children([Rc::clone(&new)]);

        assert!(old.parent().is_none());
        assert_eq!(new.index_in_parent(), Some(0));
        assert_eq!(values(root.bottom_up()), vec![3.0, 1.0]);
    }

    #[test]
    fn test_deep_chain_drops_without_recursion() {
        let mut node = Node::leaf(0.0);
        for i in 1..200_000 {
            node = Node::new(i as f64, [node]);
        }
        assert_eq!(node.top_down().count(), 200_000);
        drop(node);
    }

    #[test]
    #[should_panic(expected = "not among that parent's 1 children")]
    fn test_index_in_parent_panics_on_broken_back_reference() {
        let root = Node::new(1.0, [Node::leaf(2.0)]);
        let stray = Node::leaf(3.0);
        *stray.parent.borrow_mut() = Rc::downgrade(&root);
        stray.index_in_parent();
    }

    #[test]
    fn test_try_index_in_parent_reports_broken_back_reference() {
        let root = Node::new(1.0, [Node::leaf(2.0)]);
        let stray = Node::leaf(3.0);
        *stray.parent.borrow_mut() = Rc::downgrade(&root);
        assert_eq!(
            stray.try_index_in_parent(),
            Err(TreeError::NotAChildOfParent { siblings: 1 })
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "given twice as a child")]
    fn test_new_rejects_duplicate_child() {
        let leaf = Node::leaf(2.0);
        Node::new(1.0, [Rc::clone(&leaf), Rc::clone(&leaf)]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already has a live parent")]
    fn test_new_rejects_child_owned_elsewhere() {
        let leaf = Node::leaf(2.0);
        let _first = Node::new(1.0, [Rc::clone(&leaf)]);
        Node::new(3.0, [leaf]);
    }

    #[test]
    fn test_debug_shows_value() {
        let root = Node::new(1.5, [Node::leaf(2.5)]);
        let rendered = format!("{:?}", root);
        assert!(rendered.contains("1.5"));
        assert!(rendered.contains("2.5"));
    }
}
