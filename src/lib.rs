//! Parent-linked trees with stackless bottom-up and top-down traversal.
//!
//! [`domain::Node`] owns its children and points back at its parent through a
//! weak reference. Traversals need nothing but those links: each step is a
//! pure function of the current node, so iterators hold one position and
//! never recurse. Three cursor kinds walk the same rules:
//! - `NodeRef`, counting references at every step
//! - [`domain::Guaranteed`], borrowing through a root the caller keeps alive
//! - [`domain::ArenaCursor`], borrowing an arena holding the whole tree

pub mod bench;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
