//! Builder for complete fixed-arity trees, the benchmark's input.

use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Node, NodeRef};

/// Constructs a complete `arity`-ary tree of `depth` levels below the root,
/// every node carrying `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeBuilder {
    pub depth: u32,
    pub arity: u32,
    pub value: f64,
    pub max_nodes: u64,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            depth: 11,
            arity: 4,
            value: 1.0,
            max_nodes: 50_000_000,
        }
    }
}

impl TreeBuilder {
    pub fn new(depth: u32, arity: u32) -> Self {
        Self {
            depth,
            arity,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Nodes in the complete tree, `None` if the count overflows `u64`.
    pub fn node_count(&self) -> Option<u64> {
        let arity = u64::from(self.arity);
        let mut level = 1u64;
        let mut total = 1u64;
        for _ in 0..self.depth {
            level = level.checked_mul(arity)?;
            total = total.checked_add(level)?;
        }
        Some(total)
    }

    fn check_size(&self) -> TreeResult<u64> {
        match self.node_count() {
            Some(count) if count <= self.max_nodes => Ok(count),
            _ => Err(TreeError::TooLarge {
                depth: self.depth,
                arity: self.arity,
                max_nodes: self.max_nodes,
            }),
        }
    }

    /// Build the linked tree one level at a time, leaves first.
    #[instrument(level = "debug")]
    pub fn build(&self) -> TreeResult<NodeRef> {
        let count = self.check_size()?;
        debug!(count, "building linked tree");
        if self.arity == 0 {
            return Ok(Node::leaf(self.value));
        }

        let arity = self.arity as usize;
        let width = arity.pow(self.depth);
        let mut level: Vec<NodeRef> = (0..width).map(|_| Node::leaf(self.value)).collect();
        for _ in 0..self.depth {
            let parents = level.len() / arity;
            let mut below = level.into_iter();
            level = (0..parents)
                .map(|_| Node::new(self.value, below.by_ref().take(arity)))
                .collect();
        }
        // `width` is `arity^depth`, so exactly the root remains.
        Ok(level.swap_remove(0))
    }

    /// Same shape as [`TreeBuilder::build`], allocated directly in an arena.
    #[instrument(level = "debug")]
    pub fn build_arena(&self) -> TreeResult<TreeArena> {
        let count = self.check_size()?;
        debug!(count, "building arena tree");
        let mut tree = TreeArena::with_capacity(usize::try_from(count).unwrap_or(0));
        let root = tree.insert_node(self.value, None);

        // Children are pushed in order, so siblings end up left to right.
        let mut frontier = vec![(root, self.depth)];
        while let Some((parent, depth)) = frontier.pop() {
            if depth == 0 {
                continue;
            }
            for _ in 0..self.arity {
                let child = tree.insert_node(self.value, Some(parent));
                frontier.push((child, depth - 1));
            }
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_formula() {
        assert_eq!(TreeBuilder::new(0, 4).node_count(), Some(1));
        assert_eq!(TreeBuilder::new(3, 2).node_count(), Some(15));
        assert_eq!(TreeBuilder::new(11, 4).node_count(), Some(5_592_405));
        assert_eq!(TreeBuilder::new(5, 1).node_count(), Some(6));
        assert_eq!(TreeBuilder::new(5, 0).node_count(), Some(1));
        assert_eq!(TreeBuilder::new(64, 4).node_count(), None);
    }

    #[test]
    fn test_build_refuses_oversized_tree() {
        let builder = TreeBuilder::new(10, 4).with_max_nodes(1_000);
        assert!(matches!(builder.build(), Err(TreeError::TooLarge { .. })));
        assert!(matches!(
            builder.build_arena(),
            Err(TreeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_arena_and_linked_trees_have_same_shape() {
        let builder = TreeBuilder::new(3, 3).with_value(2.0);
        let root = builder.build().unwrap();
        let arena = builder.build_arena().unwrap();

        assert_eq!(root.node_count(), 40);
        assert_eq!(arena.len(), 40);
        assert_eq!(root.depth(), 4);
        assert_eq!(arena.depth(), 4);
        assert_eq!(arena.recursive_sum(), 80.0);
    }

    #[test]
    fn test_deep_chain_builds_without_recursion() {
        let builder = TreeBuilder::new(200_000, 1);
        let root = builder.build().unwrap();
        let arena = builder.build_arena().unwrap();

        assert_eq!(builder.node_count(), Some(200_001));
        assert_eq!(root.node_count(), 200_001);
        assert_eq!(root.depth(), 200_001);
        assert_eq!(arena.depth(), 200_001);
        assert_eq!(root.leftmost_descendant().path().len(), 200_000);
    }
}
