use anyhow::Result;
use dashmap::DashMap;
use tracing::trace;

use super::{Manifest, ManifestSource};
use crate::tree::Node;

/// Manifest source that knows the project's own manifest.
///
/// The root node of a tree is the project being locked, whose `package.json` is already
/// in hand; it is returned directly. Installed nodes go to the inner source. When
/// caching is enabled, each successful lookup is memoized by `name@version` so packages
/// that appear at several tree positions are fetched once. Failures are never cached.
///
/// # Examples
///
/// ```rust,no_run
/// use flatlock::manifest::{Manifest, ManifestFetcher, ManifestSource};
/// use flatlock::tree::Node;
///
/// # async fn example(registry: impl ManifestSource) -> anyhow::Result<()> {
/// let root_manifest = Manifest::new("1.0.0").with_dependency("pkg", "^1.0.0");
/// let fetcher = ManifestFetcher::new(root_manifest, registry);
///
/// let manifest = fetcher.fetch_manifest(&Node::new("my-app", "1.0.0")).await?;
/// assert_eq!(manifest.dependencies["pkg"], "^1.0.0");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ManifestFetcher<S> {
    root: Manifest,
    source: S,
    cache: Option<DashMap<String, Manifest>>,
}

impl<S: ManifestSource> ManifestFetcher<S> {
    /// Create a caching fetcher answering root nodes with `root`.
    pub fn new(root: Manifest, source: S) -> Self {
        Self {
            root,
            source,
            cache: Some(DashMap::new()),
        }
    }

    /// Create a fetcher that delegates every installed-node lookup to the inner source.
    pub fn uncached(root: Manifest, source: S) -> Self {
        Self {
            root,
            source,
            cache: None,
        }
    }

    /// Number of memoized manifests.
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }
}

impl<S: ManifestSource> ManifestSource for ManifestFetcher<S> {
    async fn fetch_manifest(&self, node: &Node) -> Result<Manifest> {
        if node.is_root() {
            return Ok(self.root.clone());
        }

        let key = node.spec();
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            trace!("Manifest cache hit for {}", key);
            return Ok(hit.value().clone());
        }

        let manifest = self.source.fetch_manifest(node).await?;
        if let Some(cache) = &self.cache {
            cache.insert(key, manifest.clone());
        }
        Ok(manifest)
    }
}
