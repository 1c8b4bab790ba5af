//! Resolved dependency tree model.
//!
//! A tree is made of [`Node`]s, each describing one package instance as installed
//! together with the nodes that satisfy its direct dependencies. Children are shared
//! through [`Arc`](std::sync::Arc), so a package reached from several parents (a diamond
//! dependency) is one node with several incoming edges.
//!
//! [`walk`] visits every distinct node of a tree exactly once in depth-first pre-order,
//! which is the order [`TreeFlattener::flatten_tree`](crate::flatten::TreeFlattener::flatten_tree)
//! records them in.

mod node;
mod walk;

pub use node::Node;
pub use walk::{Walk, walk};
