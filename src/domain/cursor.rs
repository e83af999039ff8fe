//! Structural navigation shared by every tree representation.
//!
//! A [`Cursor`] is a handle to one node that can reach its parent and its
//! children and nothing else. The traversal rules are written once, as default
//! methods, in terms of those links: no stack, no recursion, no visited set.

/// Handle to a node that knows its parent and its ordered children.
///
/// Cloning a cursor is the per-step cost of a traversal: for `NodeRef` it is a
/// reference-count increment, for the borrowed cursors it is a pointer copy.
pub trait Cursor: Clone {
    /// The owning node, `None` for a root.
    fn parent(&self) -> Option<Self>;

    fn child_count(&self) -> usize;

    /// Child at `index`. Panics when `index >= child_count()`.
    fn child_at(&self, index: usize) -> Self;

    /// Position of `self` among the children of `parent`, found by identity.
    ///
    /// Panics if `self` is not one of them: the back-reference is broken.
    fn position_in(&self, parent: &Self) -> usize;

    /// Identity, never value equality.
    fn is_same(&self, other: &Self) -> bool;

    fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }

    fn last_child_index(&self) -> Option<usize> {
        self.child_count().checked_sub(1)
    }

    /// Follows child 0 until a leaf; `self` if already a leaf.
    fn leftmost_descendant(&self) -> Self {
        let mut node = self.clone();
        while !node.is_leaf() {
            node = node.child_at(0);
        }
        node
    }

    /// Follows the last child until a leaf; `self` if already a leaf.
    fn rightmost_descendant(&self) -> Self {
        let mut node = self.clone();
        while let Some(last) = node.last_child_index() {
            node = node.child_at(last);
        }
        node
    }

    /// Indices from the root down to `self`; empty for a root.
    fn path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            path.push(node.position_in(&parent));
            node = parent;
        }
        path.reverse();
        path
    }

    /// Successor in bottom-up order: the parent if `self` is its last child,
    /// otherwise the leftmost leaf under the next sibling.
    ///
    /// `None` only for a root.
    fn next_bottom_up(&self) -> Option<Self> {
        let parent = self.parent()?;
        let index = self.position_in(&parent);
        if Some(index) == parent.last_child_index() {
            Some(parent)
        } else {
            Some(parent.child_at(index + 1).leftmost_descendant())
        }
    }

    /// Successor in top-down order within the subtree rooted at `top`: the
    /// first child, else the next sibling of the nearest ancestor that has one.
    ///
    /// The upward walk never passes `top`; `None` means `self` was the
    /// rightmost descendant of `top`.
    fn next_top_down(&self, top: &Self) -> Option<Self> {
        if !self.is_leaf() {
            return Some(self.child_at(0));
        }
        let mut edge = self.clone();
        while !edge.is_same(top) {
            let parent = edge.parent()?;
            let index = edge.position_in(&parent);
            if Some(index) != parent.last_child_index() {
                return Some(parent.child_at(index + 1));
            }
            edge = parent;
        }
        None
    }
}
