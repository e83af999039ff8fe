//! Borrowed traversal that skips reference counting.
//!
//! The caller already holds the subtree root, which owns every node the
//! traversal can reach. Navigation therefore goes through plain `&'a Node`
//! handles instead of cloning `Rc`s at each step. The root borrow is checked
//! by `'a`; structural stability is the caller's promise, hence the `unsafe`
//! constructors.

use std::fmt;
use std::ops::Deref;

use crate::domain::cursor::Cursor;
use crate::domain::node::Node;
use crate::domain::traversal::{BottomUp, Order, TopDown, Traversal};

/// A node reference whose liveness is guaranteed by an ancestor the caller
/// holds, not by its own reference count.
#[derive(Clone, Copy)]
pub struct Guaranteed<'a> {
    node: &'a Node,
}

impl<'a> Guaranteed<'a> {
    /// # Safety
    ///
    /// For as long as this cursor or any cursor derived from it is alive, no
    /// node of the tree containing `node` (ancestors included) may be dropped,
    /// and `Node::set_children` must not be called on any of them.
    pub unsafe fn new_unchecked(node: &'a Node) -> Self {
        Self { node }
    }

    pub fn get(self) -> &'a Node {
        self.node
    }

    // Safety: pointers handed out by the node stay valid under the contract
    // of `new_unchecked`.
    fn derive(&self, ptr: *const Node) -> Self {
        Self {
            node: unsafe { &*ptr },
        }
    }
}

impl Deref for Guaranteed<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

impl fmt::Debug for Guaranteed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guaranteed").field(&self.node.value()).finish()
    }
}

impl Cursor for Guaranteed<'_> {
    fn parent(&self) -> Option<Self> {
        self.node.parent_unretained().map(|ptr| self.derive(ptr))
    }

    fn child_count(&self) -> usize {
        self.node.child_count()
    }

    fn child_at(&self, index: usize) -> Self {
        self.derive(self.node.child_unretained(index))
    }

    fn position_in(&self, parent: &Self) -> usize {
        parent.node.child_index(self.node)
    }

    fn is_same(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl Node {
    /// Bottom-up traversal without per-step reference counting.
    ///
    /// Produces the same sequence as [`Node::bottom_up`].
    ///
    /// # Safety
    ///
    /// Neither this node nor any of its ancestors or descendants may be
    /// dropped or restructured with `set_children` while the iterator is alive.
    pub unsafe fn bottom_up_guaranteed(&self) -> BottomUp<Guaranteed<'_>> {
        BottomUp::new(Guaranteed::new_unchecked(self))
    }

    /// Top-down traversal without per-step reference counting.
    ///
    /// # Safety
    ///
    /// Same contract as [`Node::bottom_up_guaranteed`].
    pub unsafe fn top_down_guaranteed(&self) -> TopDown<Guaranteed<'_>> {
        TopDown::new(Guaranteed::new_unchecked(self))
    }

    /// # Safety
    ///
    /// Same contract as [`Node::bottom_up_guaranteed`].
    pub unsafe fn traverse_guaranteed(&self, order: Order) -> Traversal<Guaranteed<'_>> {
        Traversal::new(Guaranteed::new_unchecked(self), order)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_guaranteed_walk_leaves_reference_counts_alone() {
        let left = Node::leaf(2.0);
        let root = Node::new(1.0, [Rc::clone(&left), Node::leaf(3.0)]);

        let mut iter = unsafe { root.bottom_up_guaranteed() };
        let first = iter.next().unwrap();
        assert!(std::ptr::eq(first.get(), Rc::as_ptr(&left)));
        assert_eq!(Rc::strong_count(&root), 1);
        assert_eq!(Rc::strong_count(&left), 2);

        let rest: Vec<f64> = iter.map(|n| n.value()).collect();
        assert_eq!(rest, vec![3.0, 1.0]);
    }

    #[test]
    fn test_guaranteed_top_down_on_subtree_stops_at_subtree() {
        let inner = Node::new(2.0, [Node::leaf(4.0), Node::leaf(5.0)]);
        let root = Node::new(1.0, [Rc::clone(&inner), Node::leaf(3.0)]);

        let values: Vec<f64> = unsafe { inner.top_down_guaranteed() }
            .map(|n| n.value())
            .collect();
        assert_eq!(values, vec![2.0, 4.0, 5.0]);
        drop(root);
    }
}
