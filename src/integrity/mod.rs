//! Integrity resolution for lock entries.
//!
//! Every exported lock entry carries an integrity string. The flattener obtains it from
//! an [`IntegritySource`], given whatever the tree node recorded, the resolved tarball
//! URL, and the package manifest.
//!
//! [`Sha1IntegrityResolver`] is the default source. yarn v1 lockfiles historically pin
//! SHA-1 digests, so it prefers a SHA-1 subresource-integrity value and falls back to the
//! strongest string available:
//!
//! 1. a `sha1-` token from the node's integrity string
//! 2. the manifest's hex `shasum` converted to `sha1-<base64>`
//! 3. the node's integrity string as recorded
//! 4. the manifest's `_integrity` / `dist.integrity`
//!
//! A malformed shasum is skipped with a warning. When no step yields a value the lookup
//! fails with [`FlatlockError::IntegrityUnresolvable`].

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::future::Future;
use tracing::{debug, warn};

use crate::constants::{SHA1_HEX_LEN, SHA1_PREFIX};
use crate::core::FlatlockError;
use crate::manifest::Manifest;

/// Asynchronous integrity computation.
///
/// Implementors may write the method as a plain `async fn`.
pub trait IntegritySource: Send + Sync {
    /// Produce the final integrity string for a package.
    ///
    /// * `integrity` - the integrity string recorded on the tree node, if any
    /// * `resolved` - the resolved tarball URL, if any
    /// * `manifest` - the package manifest
    fn resolve_integrity(
        &self,
        integrity: Option<&str>,
        resolved: Option<&str>,
        manifest: &Manifest,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl<I: IntegritySource> IntegritySource for &I {
    fn resolve_integrity(
        &self,
        integrity: Option<&str>,
        resolved: Option<&str>,
        manifest: &Manifest,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).resolve_integrity(integrity, resolved, manifest)
    }
}

/// Default [`IntegritySource`] preferring SHA-1 digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1IntegrityResolver;

impl Sha1IntegrityResolver {
    /// Resolve synchronously; see the [module docs](self) for the preference order.
    pub fn resolve(
        integrity: Option<&str>,
        resolved: Option<&str>,
        manifest: &Manifest,
    ) -> Result<String> {
        let integrity = integrity.map(str::trim).filter(|s| !s.is_empty());

        if let Some(sha1) = integrity.and_then(find_sha1_token) {
            return Ok(sha1.to_string());
        }

        let mut shasum_error = None;
        if let Some(shasum) = manifest.shasum() {
            match shasum_to_sri(shasum) {
                Ok(sri) => return Ok(sri),
                Err(reason) => {
                    warn!("Ignoring manifest shasum for {}: {}", manifest_name(manifest), reason);
                    shasum_error = Some(reason);
                }
            }
        }

        if let Some(integrity) = integrity {
            debug!("No SHA-1 digest available, keeping recorded integrity");
            return Ok(integrity.to_string());
        }

        if let Some(declared) = manifest.declared_integrity() {
            return Ok(declared.to_string());
        }

        let mut reason = shasum_error.unwrap_or_else(|| {
            "no integrity on the node and no shasum or integrity in the manifest".to_string()
        });
        if let Some(resolved) = resolved {
            reason.push_str(&format!(" (resolved from {resolved})"));
        }
        Err(FlatlockError::IntegrityUnresolvable {
            name: manifest_name(manifest),
            version: manifest.version.clone(),
            reason,
        }
        .into())
    }
}

impl IntegritySource for Sha1IntegrityResolver {
    async fn resolve_integrity(
        &self,
        integrity: Option<&str>,
        resolved: Option<&str>,
        manifest: &Manifest,
    ) -> Result<String> {
        Self::resolve(integrity, resolved, manifest)
    }
}

/// First `sha1-` token of a whitespace-separated subresource-integrity string.
fn find_sha1_token(integrity: &str) -> Option<&str> {
    integrity.split_whitespace().find(|token| token.starts_with(SHA1_PREFIX))
}

/// Convert a hex SHA-1 digest to `sha1-<base64>`.
fn shasum_to_sri(shasum: &str) -> std::result::Result<String, String> {
    let shasum = shasum.trim();
    if shasum.len() != SHA1_HEX_LEN {
        return Err(format!(
            "shasum '{shasum}' has {} characters, expected {SHA1_HEX_LEN}",
            shasum.len()
        ));
    }
    let bytes = hex::decode(shasum).map_err(|e| format!("shasum '{shasum}' is not hex: {e}"))?;
    Ok(format!("{SHA1_PREFIX}{}", STANDARD.encode(bytes)))
}

/// Package name for error messages.
fn manifest_name(manifest: &Manifest) -> String {
    manifest.name.clone().unwrap_or_else(|| "<unknown>".to_string())
}
