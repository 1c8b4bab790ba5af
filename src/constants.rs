//! Global constants used throughout the flatlock codebase.

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "FLATLOCK_CONFIG_PATH";

/// Directory under the user's home holding flatlock configuration.
pub const CONFIG_DIR_NAME: &str = ".flatlock";

/// File name of the flatlock configuration inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Subresource-integrity algorithm prefix for SHA-1 digests.
pub const SHA1_PREFIX: &str = "sha1-";

/// Length in hex characters of a SHA-1 digest (`shasum` in npm manifests).
pub const SHA1_HEX_LEN: usize = 40;
