//! Package manifests and the manifest lookup capability.
//!
//! A [`Manifest`] is the declared metadata of one package version: its dependency
//! ranges, its canonical version and, for manifests coming out of an npm cache, the
//! resolved tarball URL and checksums. The flattener never parses manifests itself; it
//! asks a [`ManifestSource`] for the manifest of each node it records.
//!
//! [`ManifestFetcher`] is the source handed to the flattener in practice. It answers the
//! root node with the project's own package manifest and delegates every installed node
//! to an inner source, memoizing results per `name@version`.
//!
//! # Field Names
//!
//! Manifests use npm's field names. Older npm versions stored cache metadata under
//! underscore-prefixed names, which are kept as separate legacy fields:
//!
//! ```json
//! {
//!   "name": "pkg",
//!   "version": "1.0.0",
//!   "dependencies": { "dep": "^2.0.0" },
//!   "_resolved": "https://registry.npmjs.org/pkg/-/pkg-1.0.0.tgz",
//!   "_shasum": "5d4a2d5f7a4e0b6c0a8ef4b0b7ccf3ac7cba1fd3"
//! }
//! ```

mod fetcher;

pub use fetcher::ManifestFetcher;

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::tree::Node;

/// Declared metadata for one package version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Canonical version declared by the package
    #[serde(default)]
    pub version: String,

    /// Dependency name to semver range, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,

    /// Resolved tarball URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,

    /// Resolved tarball URL as written by older npm caches
    #[serde(default, rename = "_resolved", skip_serializing_if = "Option::is_none")]
    pub legacy_resolved: Option<String>,

    /// Integrity string as written by older npm caches
    #[serde(default, rename = "_integrity", skip_serializing_if = "Option::is_none")]
    pub legacy_integrity: Option<String>,

    /// Hex SHA-1 of the tarball as written by older npm caches
    #[serde(default, rename = "_shasum", skip_serializing_if = "Option::is_none")]
    pub shasum: Option<String>,

    /// Registry distribution metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Dist>,
}

/// The `dist` object of a registry manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dist {
    /// Tarball URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball: Option<String>,
    /// Hex SHA-1 of the tarball
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shasum: Option<String>,
    /// Subresource-integrity string of the tarball
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl Manifest {
    /// Create a manifest declaring `version` and nothing else.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Declare a dependency range.
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), range.into());
        self
    }

    /// Set the `resolved` field.
    #[must_use]
    pub fn with_resolved(mut self, resolved: impl Into<String>) -> Self {
        self.resolved = Some(resolved.into());
        self
    }

    /// Set the `_resolved` legacy field.
    #[must_use]
    pub fn with_legacy_resolved(mut self, resolved: impl Into<String>) -> Self {
        self.legacy_resolved = Some(resolved.into());
        self
    }

    /// Set the `_shasum` legacy field.
    #[must_use]
    pub fn with_shasum(mut self, shasum: impl Into<String>) -> Self {
        self.shasum = Some(shasum.into());
        self
    }

    /// Resolved tarball URL, preferring `resolved` over `_resolved`.
    #[must_use]
    pub fn resolved_url(&self) -> Option<&str> {
        self.resolved.as_deref().or(self.legacy_resolved.as_deref())
    }

    /// Hex SHA-1 shasum from `_shasum` or `dist.shasum`.
    #[must_use]
    pub fn shasum(&self) -> Option<&str> {
        self.shasum.as_deref().or_else(|| self.dist.as_ref()?.shasum.as_deref())
    }

    /// Integrity string from `_integrity` or `dist.integrity`.
    #[must_use]
    pub fn declared_integrity(&self) -> Option<&str> {
        self.legacy_integrity.as_deref().or_else(|| self.dist.as_ref()?.integrity.as_deref())
    }
}

/// Asynchronous manifest lookup keyed by tree node.
///
/// Implementations should fail with
/// [`FlatlockError::ManifestUnavailable`](crate::core::FlatlockError::ManifestUnavailable)
/// when the manifest cannot be produced. The flattener propagates the error unchanged.
///
/// Implementors may write the method as a plain `async fn`.
pub trait ManifestSource: Send + Sync {
    /// Fetch the manifest describing `node`.
    fn fetch_manifest(&self, node: &Node) -> impl Future<Output = Result<Manifest>> + Send;
}

impl<S: ManifestSource> ManifestSource for &S {
    fn fetch_manifest(&self, node: &Node) -> impl Future<Output = Result<Manifest>> + Send {
        (**self).fetch_manifest(node)
    }
}
