//! Node model: ownership, back-references and structural queries

use std::rc::Rc;

use rstest::{fixture, rstest};
use treewalk::domain::{Node, NodeRef, TreeError};
use treewalk::util::testing;

//        1
//      /   \
//     2     3
//    / \
//   4   5
#[fixture]
fn tree() -> NodeRef {
    testing::init_test_setup();
    Node::new(
        1.0,
        [
            Node::new(2.0, [Node::leaf(4.0), Node::leaf(5.0)]),
            Node::leaf(3.0),
        ],
    )
}

#[rstest]
fn given_leaf_when_querying_children_then_has_none() {
    let leaf = Node::leaf(1.0);
    assert_eq!(leaf.child_count(), 0);
    assert!(leaf.is_leaf());
    assert!(leaf.is_root());
    assert_eq!(leaf.index_in_parent(), None);
}

#[rstest]
fn given_tree_when_querying_children_then_keeps_insertion_order(tree: NodeRef) {
    assert_eq!(tree.child_count(), 2);
    assert_eq!(tree.child_at(0).value(), 2.0);
    assert_eq!(tree.child_at(1).value(), 3.0);
    assert_eq!(tree.child_at(0).child_at(1).value(), 5.0);
}

#[rstest]
#[should_panic(expected = "child index 2 out of range for node with 2 children")]
fn given_out_of_range_index_when_child_at_then_panics(tree: NodeRef) {
    tree.child_at(2);
}

#[rstest]
fn given_out_of_range_index_when_try_child_at_then_returns_error(tree: NodeRef) {
    assert_eq!(
        tree.try_child_at(7).unwrap_err(),
        TreeError::IndexOutOfRange { index: 7, len: 2 }
    );
    assert!(tree.try_child_at(1).is_ok());
}

#[rstest]
fn given_tree_when_index_in_parent_then_returns_position(tree: NodeRef) {
    let inner = tree.child_at(0);
    assert_eq!(tree.index_in_parent(), None);
    assert_eq!(inner.index_in_parent(), Some(0));
    assert_eq!(tree.child_at(1).index_in_parent(), Some(1));
    assert_eq!(inner.child_at(1).index_in_parent(), Some(1));
    // stable across calls
    assert_eq!(inner.child_at(1).index_in_parent(), Some(1));
    assert_eq!(inner.try_index_in_parent(), Ok(Some(0)));
}

#[rstest]
fn given_equal_sibling_values_when_index_in_parent_then_uses_identity() {
    let root = Node::new(0.0, [Node::leaf(1.0), Node::leaf(1.0), Node::leaf(1.0)]);
    for i in 0..3 {
        assert_eq!(root.child_at(i).index_in_parent(), Some(i));
    }
}

#[rstest]
fn given_tree_when_descending_then_finds_leftmost_and_rightmost(tree: NodeRef) {
    assert_eq!(tree.leftmost_descendant().value(), 4.0);
    assert_eq!(tree.rightmost_descendant().value(), 3.0);
    let inner = tree.child_at(0);
    assert_eq!(inner.rightmost_descendant().value(), 5.0);
}

#[rstest]
fn given_tree_when_querying_shape_then_reports_depth_count_and_paths(tree: NodeRef) {
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.node_count(), 5);
    assert_eq!(tree.path(), Vec::<usize>::new());
    assert_eq!(tree.child_at(0).child_at(1).path(), vec![0, 1]);
}

#[rstest]
fn given_dropped_root_when_child_still_held_then_back_reference_is_gone(tree: NodeRef) {
    let inner = tree.child_at(0);
    assert!(inner.parent().is_some());
    assert_eq!(Rc::strong_count(&tree), 1);

    drop(tree);

    assert!(inner.parent().is_none());
    assert!(inner.is_root());
    assert_eq!(inner.index_in_parent(), None);
    assert_eq!(inner.node_count(), 3);
}

#[rstest]
fn given_new_children_when_replaced_then_back_references_follow(tree: NodeRef) {
    let old = tree.child_at(1);
    let fresh = Node::leaf(9.0);
    tree.set_children([tree.child_at(0), Rc::clone(&fresh)]);

    assert_eq!(tree.child_count(), 2);
    assert!(old.parent().is_none());
    assert!(Rc::ptr_eq(&fresh.parent().unwrap(), &tree));
    assert_eq!(fresh.index_in_parent(), Some(1));
    assert_eq!(tree.recursive_sum(), 1.0 + 2.0 + 4.0 + 5.0 + 9.0);
}

#[rstest]
fn given_value_when_set_then_aggregates_see_it(tree: NodeRef) {
    tree.child_at(1).set_value(10.0);
    assert_eq!(tree.recursive_sum(), 22.0);
    assert_eq!(tree.recursive_bottom_up_sum(), 22.0);
}
