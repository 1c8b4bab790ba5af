use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One package instance in a resolved dependency tree.
///
/// Nodes are read-only inputs to the flattener. The root node (the project itself) has
/// no install `address`; every installed package has one, e.g. `node_modules/a` becomes
/// `a` and a nested copy becomes `a:b`.
///
/// # Examples
///
/// ```rust
/// use flatlock::tree::Node;
/// use std::sync::Arc;
///
/// let child = Arc::new(Node::new("pkg", "1.0.0").with_address("pkg"));
/// let root = Node::new("my-app", "0.1.0").with_dependency("pkg", child);
///
/// assert!(root.is_root());
/// assert_eq!(root.dependencies["pkg"].version, "1.0.0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Package name
    pub name: String,
    /// Installed version, not necessarily a valid semantic version
    pub version: String,
    /// Subresource-integrity string recorded at install time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
    /// Pre-resolved tarball URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    /// Install address; `None` for the tree root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Vendored inside its parent rather than installed independently
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bundled: bool,
    /// Nodes satisfying this node's direct dependencies, keyed by dependency name
    #[serde(skip)]
    pub dependencies: BTreeMap<String, Arc<Node>>,
}

impl Node {
    /// Create a node with the given identity and no dependencies.
    ///
    /// The node starts without an address, so it is a root until
    /// [`with_address`](Self::with_address) is called.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the install address, marking the node as installed (non-root).
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the integrity string recorded for this node.
    #[must_use]
    pub fn with_integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }

    /// Set the pre-resolved tarball URL.
    #[must_use]
    pub fn with_resolved(mut self, resolved: impl Into<String>) -> Self {
        self.resolved = Some(resolved.into());
        self
    }

    /// Mark the node as a bundled dependency.
    #[must_use]
    pub fn bundled(mut self) -> Self {
        self.bundled = true;
        self
    }

    /// Add a resolved dependency edge.
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>, node: Arc<Node>) -> Self {
        self.dependencies.insert(name.into(), node);
        self
    }

    /// Returns `true` for the tree root, i.e. a node without an install address.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.address.is_none()
    }

    /// The node satisfying dependency `name`, if the tree resolved one.
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<&Arc<Node>> {
        self.dependencies.get(name)
    }

    /// `name@version` label used in log messages and cache keys.
    #[must_use]
    pub fn spec(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}
