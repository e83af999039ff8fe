//! Lazy, restartable bottom-up and top-down iterators over any [`Cursor`].
//!
//! Each iterator stores the traversal boundary and the next position only, so
//! the extra space is constant regardless of tree size or depth.

use std::iter::FusedIterator;

use crate::domain::cursor::Cursor;

/// Which of the two traversal orders to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Descendants before ancestors, leftmost leaf first, `top` last.
    BottomUp,
    /// Ancestors before descendants, `top` first.
    TopDown,
}

/// Bottom-up (leftmost-leaf-first) traversal of the subtree under `top`.
///
/// Every descendant is produced before its ancestors, siblings left to
/// right, and `top` is always the final element.
#[derive(Debug, Clone)]
pub struct BottomUp<C: Cursor> {
    top: C,
    next: Option<C>,
}

impl<C: Cursor> BottomUp<C> {
    pub fn new(top: C) -> Self {
        let next = Some(top.leftmost_descendant());
        Self { top, next }
    }

    /// The subtree root this traversal ends at.
    pub fn top(&self) -> &C {
        &self.top
    }

    /// Rewind to the leftmost leaf.
    pub fn restart(&mut self) {
        self.next = Some(self.top.leftmost_descendant());
    }
}

impl<C: Cursor> Iterator for BottomUp<C> {
    type Item = C;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if !current.is_same(&self.top) {
            self.next = current.next_bottom_up();
        }
        Some(current)
    }
}

impl<C: Cursor> FusedIterator for BottomUp<C> {}

/// Top-down (pre-order) traversal of the subtree under `top`.
///
/// `top` comes first; the sequence ends after the rightmost descendant.
#[derive(Debug, Clone)]
pub struct TopDown<C: Cursor> {
    top: C,
    last: C,
    next: Option<C>,
}

impl<C: Cursor> TopDown<C> {
    pub fn new(top: C) -> Self {
        let last = top.rightmost_descendant();
        let next = Some(top.clone());
        Self { top, last, next }
    }

    pub fn top(&self) -> &C {
        &self.top
    }

    /// The terminal bound: the rightmost descendant of `top`.
    pub fn bound(&self) -> &C {
        &self.last
    }

    pub fn restart(&mut self) {
        self.next = Some(self.top.clone());
    }
}

impl<C: Cursor> Iterator for TopDown<C> {
    type Item = C;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if !current.is_same(&self.last) {
            self.next = current.next_top_down(&self.top);
        }
        Some(current)
    }
}

impl<C: Cursor> FusedIterator for TopDown<C> {}

/// Either traversal, picked at runtime.
#[derive(Debug, Clone)]
pub enum Traversal<C: Cursor> {
    BottomUp(BottomUp<C>),
    TopDown(TopDown<C>),
}

impl<C: Cursor> Traversal<C> {
    pub fn new(top: C, order: Order) -> Self {
        match order {
            Order::BottomUp => Self::BottomUp(BottomUp::new(top)),
            Order::TopDown => Self::TopDown(TopDown::new(top)),
        }
    }
}

impl<C: Cursor> Iterator for Traversal<C> {
    type Item = C;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::BottomUp(iter) => iter.next(),
            Self::TopDown(iter) => iter.next(),
        }
    }
}

impl<C: Cursor> FusedIterator for Traversal<C> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal cursor over a fixed parent table, independent of `Node`.
    ///
    ///        0
    ///      / | \
    ///     1  2  3
    ///    / \     \
    ///   4   5     6
    #[derive(Debug, Clone, Copy)]
    struct Table {
        id: usize,
    }

    const PARENTS: [Option<usize>; 7] = [None, Some(0), Some(0), Some(0), Some(1), Some(1), Some(3)];

    fn children(id: usize) -> Vec<usize> {
        (0..PARENTS.len()).filter(|&c| PARENTS[c] == Some(id)).collect()
    }

    impl Cursor for Table {
        fn parent(&self) -> Option<Self> {
            PARENTS[self.id].map(|id| Table { id })
        }

        fn child_count(&self) -> usize {
            children(self.id).len()
        }

        fn child_at(&self, index: usize) -> Self {
            Table {
                id: children(self.id)[index],
            }
        }

        fn position_in(&self, parent: &Self) -> usize {
            children(parent.id)
                .iter()
                .position(|&c| c == self.id)
                .expect("child of parent")
        }

        fn is_same(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    fn ids(iter: impl Iterator<Item = Table>) -> Vec<usize> {
        iter.map(|t| t.id).collect()
    }

    #[test]
    fn test_bottom_up_over_table() {
        assert_eq!(ids(BottomUp::new(Table { id: 0 })), vec![4, 5, 1, 2, 6, 3, 0]);
    }

    #[test]
    fn test_top_down_over_table() {
        assert_eq!(ids(TopDown::new(Table { id: 0 })), vec![0, 1, 4, 5, 2, 3, 6]);
    }

    #[test]
    fn test_subtree_traversal_stays_inside_subtree() {
        assert_eq!(ids(BottomUp::new(Table { id: 1 })), vec![4, 5, 1]);
        assert_eq!(ids(TopDown::new(Table { id: 1 })), vec![1, 4, 5]);
        assert_eq!(ids(TopDown::new(Table { id: 3 })), vec![3, 6]);
    }

    #[test]
    fn test_restart_replays_sequence() {
        let mut iter = TopDown::new(Table { id: 0 });
        let first: Vec<usize> = iter.by_ref().take(3).map(|t| t.id).collect();
        iter.restart();
        assert_eq!(ids(iter.by_ref()), vec![0, 1, 4, 5, 2, 3, 6]);
        assert_eq!(first, vec![0, 1, 4]);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_traversal_dispatches_on_order() {
        let up = ids(Traversal::new(Table { id: 0 }, Order::BottomUp));
        let down = ids(Traversal::new(Table { id: 0 }, Order::TopDown));
        assert_eq!(up.last(), Some(&0));
        assert_eq!(down.first(), Some(&0));
    }
}
