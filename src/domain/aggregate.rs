//! Folding node values with each traversal strategy.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::arena::TreeArena;
use crate::domain::error::TreeError;
use crate::domain::node::NodeRef;

/// How a tree's values are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Structural recursion, value before children
    Recursive,
    /// Structural recursion, children before value
    RecursiveBottomUp,
    /// `fold` over the bottom-up iterator
    Reduce,
    BottomUp,
    TopDown,
    /// Bottom-up without reference counting
    GuaranteedBottomUp,
    /// Top-down without reference counting
    GuaranteedTopDown,
    ArenaBottomUp,
    ArenaTopDown,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::Recursive,
        Strategy::RecursiveBottomUp,
        Strategy::Reduce,
        Strategy::BottomUp,
        Strategy::TopDown,
        Strategy::GuaranteedBottomUp,
        Strategy::GuaranteedTopDown,
        Strategy::ArenaBottomUp,
        Strategy::ArenaTopDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Recursive => "recursive",
            Strategy::RecursiveBottomUp => "recursive-bottom-up",
            Strategy::Reduce => "reduce",
            Strategy::BottomUp => "bottom-up",
            Strategy::TopDown => "top-down",
            Strategy::GuaranteedBottomUp => "guaranteed-bottom-up",
            Strategy::GuaranteedTopDown => "guaranteed-top-down",
            Strategy::ArenaBottomUp => "arena-bottom-up",
            Strategy::ArenaTopDown => "arena-top-down",
        }
    }

    pub fn needs_arena(self) -> bool {
        matches!(self, Strategy::ArenaBottomUp | Strategy::ArenaTopDown)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| TreeError::UnknownStrategy {
                name: s.to_string(),
                expected: Strategy::ALL.iter().join(", "),
            })
    }
}

pub fn sum_bottom_up(root: &NodeRef) -> f64 {
    let mut sum = 0.0;
    for node in root.bottom_up() {
        sum += node.value();
    }
    sum
}

pub fn sum_top_down(root: &NodeRef) -> f64 {
    let mut sum = 0.0;
    for node in root.top_down() {
        sum += node.value();
    }
    sum
}

pub fn sum_reduce(root: &NodeRef) -> f64 {
    root.bottom_up().fold(0.0, |acc, node| acc + node.value())
}

pub fn sum_guaranteed_bottom_up(root: &NodeRef) -> f64 {
    let mut sum = 0.0;
    // SAFETY: `root` is borrowed for the whole loop and nothing restructures it.
    for node in unsafe { root.bottom_up_guaranteed() } {
        sum += node.value();
    }
    sum
}

pub fn sum_guaranteed_top_down(root: &NodeRef) -> f64 {
    let mut sum = 0.0;
    // SAFETY: as above.
    for node in unsafe { root.top_down_guaranteed() } {
        sum += node.value();
    }
    sum
}

pub fn sum_arena_bottom_up(tree: &TreeArena) -> f64 {
    tree.bottom_up().map(|cursor| cursor.value()).sum()
}

pub fn sum_arena_top_down(tree: &TreeArena) -> f64 {
    tree.top_down().map(|cursor| cursor.value()).sum()
}

/// Whether any node holds `needle`; stops at the first match.
pub fn contains_value(root: &NodeRef, needle: f64) -> bool {
    root.bottom_up().any(|node| node.value() == needle)
}

/// One tree held both as linked nodes and as an arena copy.
#[derive(Debug)]
pub struct DualTree {
    pub root: NodeRef,
    pub arena: TreeArena,
}

impl DualTree {
    #[instrument(level = "debug", skip_all)]
    pub fn new(root: NodeRef) -> Self {
        let arena = TreeArena::from_node(&root);
        Self { root, arena }
    }

    pub fn from_parts(root: NodeRef, arena: TreeArena) -> Self {
        Self { root, arena }
    }

    pub fn sum(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Recursive => self.root.recursive_sum(),
            Strategy::RecursiveBottomUp => self.root.recursive_bottom_up_sum(),
            Strategy::Reduce => sum_reduce(&self.root),
            Strategy::BottomUp => sum_bottom_up(&self.root),
            Strategy::TopDown => sum_top_down(&self.root),
            Strategy::GuaranteedBottomUp => sum_guaranteed_bottom_up(&self.root),
            Strategy::GuaranteedTopDown => sum_guaranteed_top_down(&self.root),
            Strategy::ArenaBottomUp => sum_arena_bottom_up(&self.arena),
            Strategy::ArenaTopDown => sum_arena_top_down(&self.arena),
        }
    }

    pub fn contains_value(&self, needle: f64) -> bool {
        contains_value(&self.root, needle)
    }
}
