//! Semantic version helpers.
//!
//! npm trees sometimes carry version strings that are not semantic versions (dist-tags
//! such as `latest`, git references, tarball URLs). The flattener only trusts a node's
//! version when [`is_valid_semver`] accepts it and otherwise falls back to the version
//! declared by the package manifest.

use semver::Version;

/// Parse a version string the way npm's strict `semver.valid` does.
///
/// Surrounding whitespace and a single leading `v` are ignored. Range operators,
/// dist-tags and partial versions (`1.2`) are rejected.
///
/// # Examples
///
/// ```rust
/// use flatlock::version::parse_exact_version;
///
/// assert!(parse_exact_version("v1.2.3").is_some());
/// assert!(parse_exact_version("latest").is_none());
/// ```
#[must_use]
pub fn parse_exact_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).ok()
}

/// Returns `true` when `version` is a valid exact semantic version.
#[must_use]
pub fn is_valid_semver(version: &str) -> bool {
    parse_exact_version(version).is_some()
}
