// Cycle-tolerant writes over `Shared` node graphs.
mod common;

use common::{TreeNode, acyclic_tree, cyclic_tree, init_tracing, tree_node};
use jsonfile::api::{
    self, CycleHandling, ErrorKind, JsonPolicy, ReadOptions, WriteOptions,
};

#[test]
fn cyclic_graph_writes_and_grows_past_acyclic_equivalent() {
    init_tracing();
    let temp = tempfile::tempdir().expect("tempdir");
    let cyclic_path = temp.path().join("cyclic.json");
    let acyclic_path = temp.path().join("acyclic.json");

    api::write_tree(&cyclic_path, &cyclic_tree(), true).expect("write cyclic");
    api::write_tree(&acyclic_path, &acyclic_tree(), true).expect("write acyclic");

    let cyclic = std::fs::read_to_string(&cyclic_path).expect("text");
    let acyclic = std::fs::read_to_string(&acyclic_path).expect("text");
    assert!(cyclic.len() > acyclic.len());
    assert_eq!(cyclic.matches("\"root\"").count(), 2);
    assert_eq!(acyclic.matches("\"root\"").count(), 1);
    assert!(cyclic.contains('\n'));
}

#[test]
fn plain_write_of_cyclic_graph_fails_without_touching_the_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("tree.json");
    api::write_tree(&path, &acyclic_tree(), true).expect("seed");
    let before = std::fs::read_to_string(&path).expect("text");

    let err = api::write(&path, &cyclic_tree(), WriteOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encode);
    assert!(err.to_string().contains("self-referencing loop"));
    assert_eq!(std::fs::read_to_string(&path).expect("text"), before);
}

#[test]
fn write_tree_respects_create_flag() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("tree.json");

    let err = api::write_tree(&path, &acyclic_tree(), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(!path.exists());
}

#[test]
fn ignore_policy_cuts_the_back_edge() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("tree.json");
    let policy = JsonPolicy::tree().with_cycles(CycleHandling::Ignore);

    api::write_with_policy(&path, &cyclic_tree(), true, &policy).expect("write");
    let text = std::fs::read_to_string(&path).expect("text");
    assert_eq!(text.matches("\"root\"").count(), 1);
    assert!(text.contains("null"));
}

#[test]
fn acyclic_tree_output_reads_back_as_fresh_nodes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("tree.json");
    let shared_leaf = tree_node("leaf");
    let root = tree_node("root");
    root.borrow_mut().children.push(shared_leaf.clone());
    root.borrow_mut().children.push(shared_leaf);

    api::write_tree(&path, &root, true).expect("write");
    let read: jsonfile::api::Shared<TreeNode> =
        api::read(&path, ReadOptions::default()).expect("read");
    let node = read.borrow();
    assert_eq!(node.name, "root");
    assert_eq!(node.children.len(), 2);
    assert!(!node.children[0].ptr_eq(&node.children[1]));
    assert_eq!(node.children[1].borrow().name, "leaf");
}
