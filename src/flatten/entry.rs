use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::tree::Node;

/// Registry key identifying one resolved package version.
///
/// Two tree nodes with equal `(name, version)` always map to the same key, wherever
/// they sit in the tree. The key is structural, so `("ab", "1.0")` and `("a", "b1.0")`
/// stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    name: String,
    version: String,
}

impl EntryKey {
    /// Build the key for a package name and resolved version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Package name part of the key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version part of the key.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Canonical record accumulated for one [`EntryKey`].
///
/// An entry can be created by a parent recording a semver range for it before the
/// entry's own node is recorded; until then every identity field is unset and only
/// [`semvers`](Self::semvers) has content.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub(crate) node: Option<Arc<Node>>,
    pub(crate) name: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) dependencies: Option<IndexMap<String, String>>,
    pub(crate) integrity: Option<String>,
    pub(crate) resolved: Option<String>,
    pub(crate) semvers: Vec<String>,
}

impl Entry {
    /// The first node recorded for this identity.
    pub fn node(&self) -> Option<&Arc<Node>> {
        self.node.as_ref()
    }

    /// Package name, set once a non-root, non-bundled node is recorded.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolved version.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Dependency ranges declared by the package manifest.
    pub fn dependencies(&self) -> Option<&IndexMap<String, String>> {
        self.dependencies.as_ref()
    }

    /// Integrity string.
    pub fn integrity(&self) -> Option<&str> {
        self.integrity.as_deref()
    }

    /// Resolved tarball URL.
    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// Every semver range parents requested this identity under, in discovery order.
    pub fn semvers(&self) -> &[String] {
        &self.semvers
    }

    /// Exported view of the entry, or `None` while it has no name.
    pub fn to_lock_entry(&self) -> Option<LockEntry> {
        let (Some(node), Some(name)) = (&self.node, &self.name) else {
            return None;
        };

        Some(LockEntry {
            node: Arc::clone(node),
            name: name.clone(),
            version: self.version.clone().unwrap_or_default(),
            dependencies: self.dependencies.clone().unwrap_or_default(),
            integrity: self.integrity.clone().unwrap_or_default(),
            resolved: self.resolved.clone(),
        })
    }
}

/// One exported lock record, as handed to a lockfile serializer.
///
/// The same `LockEntry` appears under every `name@range` label that reached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockEntry {
    /// First tree node recorded for this package version
    #[serde(skip)]
    pub node: Arc<Node>,
    /// Package name
    pub name: String,
    /// Resolved version
    pub version: String,
    /// Declared dependency ranges
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,
    /// Integrity string
    pub integrity: String,
    /// Resolved tarball URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
}
