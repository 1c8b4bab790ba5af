//! In-memory collaborators and sample trees.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::FlatlockError;
use crate::flatten::TreeFlattener;
use crate::integrity::IntegritySource;
use crate::manifest::{Manifest, ManifestFetcher, ManifestSource};
use crate::tree::Node;

/// Manifest source backed by a map from `name@version` to manifest.
///
/// Unknown packages fail with [`FlatlockError::ManifestUnavailable`]. Clones share the
/// lookup counter.
#[derive(Debug, Clone, Default)]
pub struct StaticManifests {
    manifests: HashMap<String, Manifest>,
    calls: Arc<AtomicUsize>,
}

impl StaticManifests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the manifest returned for `name@version`.
    #[must_use]
    pub fn with(mut self, name: &str, version: &str, manifest: Manifest) -> Self {
        self.insert(name, version, manifest);
        self
    }

    pub fn insert(&mut self, name: &str, version: &str, manifest: Manifest) {
        self.manifests.insert(format!("{name}@{version}"), manifest);
    }

    /// Number of lookups served or refused so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ManifestSource for StaticManifests {
    async fn fetch_manifest(&self, node: &Node) -> Result<Manifest> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.manifests.get(&node.spec()).cloned().ok_or_else(|| {
            FlatlockError::ManifestUnavailable {
                name: node.name.clone(),
                version: node.version.clone(),
                reason: "no manifest registered".to_string(),
            }
            .into()
        })
    }
}

/// Integrity source that echoes the node's integrity or derives a fake one.
///
/// Without a node integrity the result is `sha1-<manifest version>`. A failing
/// instance rejects every request with [`FlatlockError::IntegrityUnresolvable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIntegrity {
    fail: bool,
}

impl StaticIntegrity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
        }
    }
}

impl IntegritySource for StaticIntegrity {
    async fn resolve_integrity(
        &self,
        integrity: Option<&str>,
        _resolved: Option<&str>,
        manifest: &Manifest,
    ) -> Result<String> {
        if self.fail {
            return Err(FlatlockError::IntegrityUnresolvable {
                name: manifest.name.clone().unwrap_or_default(),
                version: manifest.version.clone(),
                reason: "integrity source configured to fail".to_string(),
            }
            .into());
        }
        Ok(integrity.map_or_else(|| format!("sha1-{}", manifest.version), str::to_string))
    }
}

/// A resolved tree together with the manifests describing it.
#[derive(Debug, Clone)]
pub struct TreeFixture {
    pub root: Arc<Node>,
    pub root_manifest: Manifest,
    pub manifests: StaticManifests,
}

impl TreeFixture {
    /// `app` depends on `pkg@1.0.0` under `^1.0.0`.
    pub fn single_child() -> Self {
        let pkg = Arc::new(Node::new("pkg", "1.0.0").with_address("pkg"));
        let root = Arc::new(Node::new("app", "0.1.0").with_dependency("pkg", pkg));

        Self {
            root,
            root_manifest: Manifest::new("0.1.0").with_dependency("pkg", "^1.0.0"),
            manifests: StaticManifests::new().with("pkg", "1.0.0", Manifest::new("1.0.0")),
        }
    }

    /// `app` depends on `a` and `b`; `a` wants `c@^2.0.0`, `b` wants `c@~2.0.0`, and
    /// both are satisfied by one `c@2.0.0` node.
    pub fn diamond() -> Self {
        let c = Arc::new(Node::new("c", "2.0.0").with_address("c"));
        let a = Arc::new(Node::new("a", "1.0.0").with_address("a").with_dependency("c", c.clone()));
        let b = Arc::new(Node::new("b", "1.0.0").with_address("b").with_dependency("c", c));
        let root = Arc::new(Node::new("app", "0.1.0").with_dependency("a", a).with_dependency("b", b));

        let manifests = StaticManifests::new()
            .with("a", "1.0.0", Manifest::new("1.0.0").with_dependency("c", "^2.0.0"))
            .with("b", "1.0.0", Manifest::new("1.0.0").with_dependency("c", "~2.0.0"))
            .with("c", "2.0.0", Manifest::new("2.0.0"));

        Self {
            root,
            root_manifest: Manifest::new("0.1.0")
                .with_dependency("a", "^1.0.0")
                .with_dependency("b", "^1.0.0"),
            manifests,
        }
    }

    /// Find a node of the fixture tree by name.
    pub fn node(&self, name: &str) -> Option<Arc<Node>> {
        crate::tree::walk(&self.root).find(|node| node.name == name)
    }

    /// Flattener wired to this fixture's manifests and a passing integrity source.
    pub fn flattener(&self) -> TreeFlattener<ManifestFetcher<StaticManifests>, StaticIntegrity> {
        TreeFlattener::new(self.root_manifest.clone(), self.manifests.clone(), StaticIntegrity::new())
    }
}
