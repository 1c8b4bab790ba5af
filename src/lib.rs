//! flatlock - flatten resolved npm dependency trees into yarn-style lock entries
//!
//! An npm `node_modules` tree installs the same package version at many positions, each
//! reached from parents that requested it under their own semver ranges. A yarn v1
//! lockfile wants the opposite view: one record per resolved package version, listed
//! under every `name@range` that reached it. This crate computes that view.
//!
//! # Architecture Overview
//!
//! - [`tree`] - the resolved dependency tree ([`tree::Node`]) and a depth-first walker
//! - [`manifest`] - package manifests and the [`manifest::ManifestSource`] lookup trait
//! - [`integrity`] - the [`integrity::IntegritySource`] trait and a SHA-1 preferring default
//! - [`flatten`] - [`flatten::TreeFlattener`], the deduplicating registry and its export
//! - [`config`] - settings loaded from `~/.flatlock/config.toml`
//! - [`core`] - error types and user-facing error reporting
//! - [`version`] - semantic version validity checks
//!
//! Manifest fetching and integrity computation are collaborators supplied by the caller;
//! the flattener awaits them and propagates their errors unchanged.
//!
//! # Example
//!
//! ```rust,no_run
//! use flatlock::config::FlattenConfig;
//! use flatlock::flatten::TreeFlattener;
//! use flatlock::integrity::Sha1IntegrityResolver;
//! use flatlock::manifest::{Manifest, ManifestSource};
//! use flatlock::tree::Node;
//! use std::sync::Arc;
//!
//! # async fn example(registry: impl ManifestSource, root: Arc<Node>, package_json: Manifest) -> anyhow::Result<()> {
//! let config = FlattenConfig::load().await?;
//! let mut flattener =
//!     TreeFlattener::with_config(package_json, registry, Sha1IntegrityResolver, config);
//! flattener.flatten_tree(&root).await?;
//!
//! for (label, entry) in flattener.export_entries() {
//!     println!("{label}: {} {}", entry.version, entry.integrity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod core;
pub mod flatten;
pub mod integrity;
pub mod manifest;
pub mod tree;
pub mod version;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
