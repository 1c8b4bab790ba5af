//! Tree flattening: resolved dependency tree to deduplicated lock entries.
//!
//! npm installs the same package version at many positions of `node_modules`, and each
//! parent may request it under a different semver range. A yarn-style lockfile instead
//! holds one record per resolved package version, listed under every range that
//! reached it. [`TreeFlattener`] builds that view:
//!
//! 1. [`record_node`](TreeFlattener::record_node) is called once per tree node. It
//!    fetches the node's manifest, pushes each declared dependency range onto the entry
//!    of the child that satisfies it, and (for installed, non-bundled nodes) fills in
//!    the node's own entry.
//! 2. [`export_entries`](TreeFlattener::export_entries) turns the registry into a map
//!    from `name@range` labels to [`LockEntry`] records.
//!
//! # Update Rules
//!
//! - `node` is first-writer-wins: the first node recorded for an identity is kept.
//! - `name`, `version`, `dependencies`, `integrity` and `resolved` are rewritten by every
//!   recording of the identity, so the last node recorded determines them.
//! - `semvers` is append-only and keeps duplicates unless
//!   [`FlattenConfig::dedupe_semvers`] is set.
//! - The root node (no install address) and bundled nodes never fill in their own entry.
//!
//! # Ordering
//!
//! [`record_node`](TreeFlattener::record_node) takes `&mut self`, so recordings cannot
//! overlap and the result depends only on the order nodes are recorded in.
//! [`flatten_tree`](TreeFlattener::flatten_tree) records a whole tree in depth-first
//! pre-order.
//!
//! # Examples
//!
//! ```rust,no_run
//! use flatlock::flatten::TreeFlattener;
//! use flatlock::integrity::Sha1IntegrityResolver;
//! use flatlock::manifest::{Manifest, ManifestSource};
//! use flatlock::tree::Node;
//! use std::sync::Arc;
//!
//! # async fn example(registry: impl ManifestSource) -> anyhow::Result<()> {
//! let pkg = Arc::new(Node::new("pkg", "1.0.0").with_address("pkg"));
//! let root = Arc::new(Node::new("my-app", "0.1.0").with_dependency("pkg", pkg));
//! let root_manifest = Manifest::new("0.1.0").with_dependency("pkg", "^1.0.0");
//!
//! let mut flattener = TreeFlattener::new(root_manifest, registry, Sha1IntegrityResolver);
//! flattener.flatten_tree(&root).await?;
//!
//! let entries = flattener.export_entries();
//! assert_eq!(entries["pkg@^1.0.0"].version, "1.0.0");
//! # Ok(())
//! # }
//! ```

mod entry;

pub use entry::{Entry, EntryKey, LockEntry};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::FlattenConfig;
use crate::integrity::IntegritySource;
use crate::manifest::{Manifest, ManifestFetcher, ManifestSource};
use crate::tree::{Node, walk};
use crate::version::is_valid_semver;

/// Accumulates lock entries from the nodes of a resolved dependency tree.
///
/// Generic over the manifest lookup `M` and integrity computation `I` collaborators.
/// Errors from either are returned from [`record_node`](Self::record_node) unchanged;
/// the registry keeps whatever state it had reached.
#[derive(Debug)]
pub struct TreeFlattener<M, I> {
    manifests: M,
    integrity: I,
    config: FlattenConfig,
    entries: IndexMap<EntryKey, Entry>,
}

impl<S: ManifestSource, I: IntegritySource> TreeFlattener<ManifestFetcher<S>, I> {
    /// Create a flattener for a project whose own manifest is `root_manifest`.
    ///
    /// Installed nodes are looked up through `source`; see [`ManifestFetcher`].
    pub fn new(root_manifest: Manifest, source: S, integrity: I) -> Self {
        Self::with_config(root_manifest, source, integrity, FlattenConfig::default())
    }

    /// Like [`new`](Self::new) with explicit settings.
    pub fn with_config(
        root_manifest: Manifest,
        source: S,
        integrity: I,
        config: FlattenConfig,
    ) -> Self {
        let manifests = if config.cache_manifests {
            ManifestFetcher::new(root_manifest, source)
        } else {
            ManifestFetcher::uncached(root_manifest, source)
        };
        Self::from_sources(manifests, integrity, config)
    }
}

impl<M: ManifestSource, I: IntegritySource> TreeFlattener<M, I> {
    /// Create a flattener from ready-made collaborators.
    ///
    /// `manifests` must answer root nodes itself.
    pub fn from_sources(manifests: M, integrity: I, config: FlattenConfig) -> Self {
        Self {
            manifests,
            integrity,
            config,
            entries: IndexMap::new(),
        }
    }

    /// Record one tree node.
    ///
    /// Bundled nodes are ignored. For every other node the manifest is fetched and each
    /// declared dependency that the tree resolved gets the declared range appended to
    /// the child's entry. Installed nodes then write their own entry.
    ///
    /// # Errors
    ///
    /// Returns the manifest lookup or integrity computation error unchanged. Integrity
    /// is computed before the node's own entry is touched, so a failure there leaves
    /// that entry as it was; ranges recorded for the node's children are kept.
    pub async fn record_node(&mut self, node: &Arc<Node>) -> Result<()> {
        if node.bundled {
            trace!("Skipping bundled dependency {}", node.spec());
            return Ok(());
        }

        let manifest = self.manifests.fetch_manifest(node).await?;
        let resolved =
            node.resolved.clone().or_else(|| manifest.resolved_url().map(str::to_string));

        self.record_semvers(node, &manifest);

        if node.is_root() {
            debug!("Recorded dependency ranges of root {}", node.spec());
            return Ok(());
        }

        let integrity = self
            .integrity
            .resolve_integrity(node.integrity.as_deref(), resolved.as_deref(), &manifest)
            .await?;

        let version = if is_valid_semver(&node.version) {
            node.version.clone()
        } else {
            debug!(
                "Version '{}' of {} is not semver, using manifest version {}",
                node.version, node.name, manifest.version
            );
            manifest.version.clone()
        };

        let key = EntryKey::new(node.name.clone(), node.version.clone());
        debug!("Recording {} at {}", key, node.address.as_deref().unwrap_or_default());

        let entry = self.entries.entry(key).or_default();
        entry.node.get_or_insert_with(|| Arc::clone(node));
        entry.name = Some(node.name.clone());
        entry.version = Some(version);
        entry.dependencies = Some(manifest.dependencies);
        entry.integrity = Some(integrity);
        entry.resolved = resolved;

        Ok(())
    }

    /// Record every node reachable from `root` in depth-first pre-order.
    ///
    /// Stops at the first failing node; the error names that node.
    pub async fn flatten_tree(&mut self, root: &Arc<Node>) -> Result<()> {
        for node in walk(root) {
            self.record_node(&node)
                .await
                .with_context(|| format!("Failed to record {}", node.spec()))?;
        }
        debug!("Flattened tree into {} entries", self.entries.len());
        Ok(())
    }

    /// Export the registry as `name@range` labels mapped to lock records.
    ///
    /// Entries are visited in key-insertion order and each contributes one label per
    /// recorded range. Entries that never acquired a name (bundled packages, packages
    /// only ever referenced as children) are skipped. When a label repeats, the later
    /// record replaces the earlier one in place.
    pub fn export_entries(&self) -> IndexMap<String, LockEntry> {
        let mut exported = IndexMap::new();
        for entry in self.entries.values() {
            let Some(lock_entry) = entry.to_lock_entry() else {
                continue;
            };
            for range in &entry.semvers {
                exported.insert(format!("{}@{}", lock_entry.name, range), lock_entry.clone());
            }
        }
        exported
    }

    /// Entry for a resolved package version, if one was created.
    pub fn entry(&self, name: &str, version: &str) -> Option<&Entry> {
        self.entries.get(&EntryKey::new(name, version))
    }

    /// Iterate over registry entries in key-insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&EntryKey, &Entry)> {
        self.entries.iter()
    }

    /// Number of registry entries, placeholders included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Settings in effect.
    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    fn record_semvers(&mut self, node: &Node, manifest: &Manifest) {
        let dedupe = self.config.dedupe_semvers;
        for (dep_name, range) in &manifest.dependencies {
            // Optional or platform-specific dependencies may be absent from the tree
            let Some(child) = node.dependency(dep_name) else {
                trace!("{} declares {} but the tree has no node for it", node.spec(), dep_name);
                continue;
            };

            let key = EntryKey::new(dep_name.clone(), child.version.clone());
            let entry = self.entries.entry(key).or_default();
            if dedupe && entry.semvers.contains(range) {
                continue;
            }
            trace!("{}@{} requested as {}", dep_name, child.version, range);
            entry.semvers.push(range.clone());
        }
    }
}
