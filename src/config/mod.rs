//! Configuration for flatlock.
//!
//! Settings live in a TOML file, `~/.flatlock/config.toml` by default
//! (`%LOCALAPPDATA%\flatlock\config.toml` on Windows). The location can be overridden
//! with the `FLATLOCK_CONFIG_PATH` environment variable. A missing file is not an
//! error: every setting has a default.
//!
//! ```toml
//! # Memoize manifest lookups per name@version (default: true)
//! cache_manifests = true
//!
//! # Skip pushing a semver range an entry already holds (default: false)
//! dedupe_semvers = false
//! ```

mod flatten;

pub use flatten::FlattenConfig;
