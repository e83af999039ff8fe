/*
Rendering for both tree representations via termtree.
Labels are positional paths (`root`, `0`, `0.2`, ...) plus the node value,
so equal values stay distinguishable.
 */
use std::rc::Rc;

use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::TreeArena;
use crate::domain::cursor::Cursor;
use crate::domain::node::NodeRef;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// `root` for the empty path, dot-separated indices otherwise.
pub fn path_label(path: &[usize]) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.iter().join(".")
    }
}

fn label(path: &[usize], value: f64) -> String {
    format!("{} = {}", path_label(path), value)
}

struct Frame<C> {
    cursor: C,
    next_child: usize,
    leaves: Vec<Tree<String>>,
}

impl<C> Frame<C> {
    fn new(cursor: C) -> Self {
        Self {
            cursor,
            next_child: 0,
            leaves: Vec::new(),
        }
    }
}

/// Assemble the termtree with an explicit stack; a subtree is finished once
/// all of its children are.
fn render<C: Cursor>(top: C, value: impl Fn(&C) -> f64) -> Tree<String> {
    let mut stack = vec![Frame::new(top)];
    let mut path = Vec::new();
    let mut rendered = None;

    while let Some(frame) = stack.last_mut() {
        if frame.next_child < frame.cursor.child_count() {
            let child = frame.cursor.child_at(frame.next_child);
            path.push(frame.next_child);
            frame.next_child += 1;
            stack.push(Frame::new(child));
            continue;
        }
        let Some(done) = stack.pop() else { break };
        let tree = Tree::new(label(&path, value(&done.cursor))).with_leaves(done.leaves);
        path.pop();
        match stack.last_mut() {
            Some(parent) => parent.leaves.push(tree),
            None => rendered = Some(tree),
        }
    }
    rendered.unwrap_or_else(|| Tree::new(String::new()))
}

impl TreeNodeConvert for NodeRef {
    #[instrument(level = "debug", skip_all)]
    fn to_tree_string(&self) -> Tree<String> {
        render(Rc::clone(self), |node| node.value())
    }
}

impl TreeNodeConvert for TreeArena {
    #[instrument(level = "debug", skip_all)]
    fn to_tree_string(&self) -> Tree<String> {
        match self.root_cursor() {
            Some(root) => render(root, |cursor| cursor.value()),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::Node;

    #[test]
    fn test_path_label() {
        assert_eq!(path_label(&[]), "root");
        assert_eq!(path_label(&[0, 2, 1]), "0.2.1");
    }

    #[test]
    fn test_linked_and_arena_render_identically() {
        let root = Node::new(1.0, [Node::new(2.0, [Node::leaf(4.0)]), Node::leaf(3.0)]);
        let arena = TreeArena::from_node(&root);

        let linked = root.to_tree_string().to_string();
        assert_eq!(linked, arena.to_tree_string().to_string());
        assert!(linked.starts_with("root = 1\n"));
        assert!(linked.contains("0.0 = 4"));
    }

    #[test]
    fn test_empty_arena_renders_placeholder() {
        assert_eq!(
            TreeArena::new().to_tree_string().to_string(),
            "Empty tree\n"
        );
    }
}
