use std::collections::HashSet;
use std::sync::Arc;

use super::Node;

/// Depth-first pre-order traversal over a dependency tree.
///
/// Each distinct node (by pointer identity) is yielded once, even when several parents
/// share it. Children are visited in dependency-name order.
pub struct Walk {
    stack: Vec<Arc<Node>>,
    seen: HashSet<usize>,
}

/// Walk `root` and every node reachable from it.
///
/// # Examples
///
/// ```rust
/// use flatlock::tree::{Node, walk};
/// use std::sync::Arc;
///
/// let shared = Arc::new(Node::new("c", "1.0.0").with_address("c"));
/// let a = Arc::new(Node::new("a", "1.0.0").with_address("a").with_dependency("c", shared.clone()));
/// let b = Arc::new(Node::new("b", "1.0.0").with_address("b").with_dependency("c", shared));
/// let root = Arc::new(Node::new("app", "0.0.0").with_dependency("a", a).with_dependency("b", b));
///
/// let names: Vec<String> = walk(&root).map(|n| n.name.clone()).collect();
/// assert_eq!(names, ["app", "a", "c", "b"]);
/// ```
#[must_use]
pub fn walk(root: &Arc<Node>) -> Walk {
    Walk {
        stack: vec![Arc::clone(root)],
        seen: HashSet::new(),
    }
}

impl Iterator for Walk {
    type Item = Arc<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if !self.seen.insert(Arc::as_ptr(&node) as usize) {
                continue;
            }
            // Reverse so the first dependency name is popped first.
            for child in node.dependencies.values().rev() {
                if !self.seen.contains(&(Arc::as_ptr(child) as usize)) {
                    self.stack.push(Arc::clone(child));
                }
            }
            return Some(node);
        }
        None
    }
}
