//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural errors of the tree model.
///
/// `IndexOutOfRange` and `NotAChildOfParent` describe broken invariants: the
/// plain accessors panic with these messages, the `try_*` accessors return them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("child index {index} out of range for node with {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node claims a parent but is not among that parent's {siblings} children")]
    NotAChildOfParent { siblings: usize },

    #[error("tree of depth {depth} and arity {arity} exceeds the limit of {max_nodes} nodes")]
    TooLarge {
        depth: u32,
        arity: u32,
        max_nodes: u64,
    },

    #[error("arena has no node at index {0}")]
    MissingNode(String),

    #[error("unknown strategy '{name}', expected one of: {expected}")]
    UnknownStrategy { name: String, expected: String },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
