//! Domain layer: tree model, traversal engine and aggregates
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod arena;
pub mod builder;
pub mod cursor;
pub mod display;
pub mod error;
pub mod guaranteed;
pub mod node;
pub mod traversal;

pub use aggregate::{DualTree, Strategy};
pub use arena::{ArenaCursor, ArenaNode, TreeArena};
pub use builder::TreeBuilder;
pub use cursor::Cursor;
pub use display::{path_label, TreeNodeConvert};
pub use error::{TreeError, TreeResult};
pub use guaranteed::Guaranteed;
pub use node::{Node, NodeRef};
pub use traversal::{BottomUp, Order, TopDown, Traversal};
