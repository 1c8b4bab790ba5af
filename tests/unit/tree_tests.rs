//! Unit tests for tree traversal over shared subtrees.

use flatlock::tree::{Node, walk};
use std::sync::Arc;

fn installed(name: &str, version: &str) -> Node {
    Node::new(name, version).with_address(name)
}

#[test]
fn nested_duplicates_at_different_addresses_are_distinct_nodes() {
    let nested = Arc::new(Node::new("lodash", "3.10.1").with_address("old-lib:lodash"));
    let old_lib = Arc::new(installed("old-lib", "1.0.0").with_dependency("lodash", nested));
    let hoisted = Arc::new(installed("lodash", "4.17.21"));
    let root = Arc::new(
        Node::new("app", "1.0.0")
            .with_dependency("lodash", hoisted)
            .with_dependency("old-lib", old_lib),
    );

    let visited: Vec<String> = walk(&root).map(|node| node.spec()).collect();

    assert_eq!(visited, ["app@1.0.0", "lodash@4.17.21", "old-lib@1.0.0", "lodash@3.10.1"]);
}

#[test]
fn long_chain_is_walked_root_first() {
    let mut node = Arc::new(installed("leaf", "1.0.0"));
    for depth in 0..200 {
        node = Arc::new(
            installed(&format!("n{depth}"), "1.0.0").with_dependency("next", Arc::clone(&node)),
        );
    }

    let visited: Vec<String> = walk(&node).map(|n| n.name.clone()).collect();
    assert_eq!(visited.len(), 201);
    assert_eq!(visited.first().map(String::as_str), Some("n199"));
    assert_eq!(visited.last().map(String::as_str), Some("leaf"));
}
