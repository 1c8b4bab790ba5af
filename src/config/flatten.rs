use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
use crate::core::FlatlockError;

const fn default_cache_manifests() -> bool {
    true
}

/// Settings controlling how a tree is flattened.
///
/// # Examples
///
/// ```rust
/// use flatlock::config::FlattenConfig;
///
/// let config = FlattenConfig::from_toml_str("dedupe_semvers = true").unwrap();
/// assert!(config.dedupe_semvers);
/// assert!(config.cache_manifests);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlattenConfig {
    /// Memoize manifest lookups per `name@version`.
    #[serde(default = "default_cache_manifests")]
    pub cache_manifests: bool,

    /// Record each semver range at most once per entry.
    ///
    /// Off by default: an entry keeps every range pushed for it, duplicates included, in
    /// discovery order. Duplicate ranges collapse to one label at export either way.
    #[serde(default)]
    pub dedupe_semvers: bool,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            cache_manifests: default_cache_manifests(),
            dedupe_semvers: false,
        }
    }
}

impl FlattenConfig {
    /// Load configuration from `FLATLOCK_CONFIG_PATH` or the default location.
    ///
    /// Returns the default configuration when the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The default path cannot be determined
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML or unknown settings
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load configuration from `path` if given, otherwise as [`load`](Self::load) does.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(FlatlockError::from)
            .with_context(|| format!("Failed to read flatlock config from {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse flatlock config from {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            FlatlockError::ConfigError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Path of the configuration file.
    ///
    /// `FLATLOCK_CONFIG_PATH` wins when set; otherwise `~/.flatlock/config.toml`, or
    /// `%LOCALAPPDATA%\flatlock\config.toml` on Windows.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("flatlock")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(CONFIG_DIR_NAME)
        };

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }
}
