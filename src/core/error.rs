//! Error handling for flatlock
//!
//! This module provides the error types raised while flattening a dependency tree and a
//! small user-facing reporting layer on top of them. The system follows two principles:
//! 1. **Strongly-typed errors** so callers can match on the failing collaborator
//! 2. **User-friendly messages** with actionable suggestions when errors reach a terminal
//!
//! # Architecture
//!
//! - [`FlatlockError`] - Enumerated error types for every failure the flattener surfaces
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//!
//! Collaborator failures (manifest lookup, integrity resolution) are returned as
//! [`anyhow::Error`] values wrapping a [`FlatlockError`]. The flattener propagates them
//! unchanged with `?`, so callers can recover the typed variant with
//! [`anyhow::Error::downcast_ref`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use flatlock::core::{FlatlockError, user_friendly_error};
//!
//! let error = FlatlockError::ManifestUnavailable {
//!     name: "left-pad".to_string(),
//!     version: "1.3.0".to_string(),
//!     reason: "not found in cache".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for flatlock operations.
///
/// # Error Categories
///
/// - [`ManifestUnavailable`] - the manifest lookup collaborator could not produce a manifest
/// - [`IntegrityUnresolvable`] - no integrity string could be derived for a package
/// - [`ConfigError`] - configuration file is unreadable or invalid
/// - [`IoError`] - the configuration file could not be read
///
/// Malformed node version strings are not errors: the flattener falls back to the
/// manifest's declared version.
///
/// [`ManifestUnavailable`]: FlatlockError::ManifestUnavailable
/// [`IntegrityUnresolvable`]: FlatlockError::IntegrityUnresolvable
/// [`ConfigError`]: FlatlockError::ConfigError
/// [`IoError`]: FlatlockError::IoError
#[derive(Error, Debug)]
pub enum FlatlockError {
    /// Manifest lookup failed for a node
    ///
    /// Raised by [`ManifestSource`](crate::manifest::ManifestSource) implementations when
    /// the network or cache layer cannot return the manifest, the package is missing, or
    /// the returned manifest does not match the requested version.
    #[error("Manifest unavailable for {name}@{version}: {reason}")]
    ManifestUnavailable {
        /// Package name of the node being looked up
        name: String,
        /// Version of the node being looked up
        version: String,
        /// Why the lookup failed
        reason: String,
    },

    /// No integrity string could be derived for a package
    #[error("Cannot resolve integrity for {name}@{version}: {reason}")]
    IntegrityUnresolvable {
        /// Package name
        name: String,
        /// Package version as declared by its manifest
        version: String,
        /// Why no integrity could be derived
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for FlatlockError {
    fn clone(&self) -> Self {
        match self {
            Self::ManifestUnavailable {
                name,
                version,
                reason,
            } => Self::ManifestUnavailable {
                name: name.clone(),
                version: version.clone(),
                reason: reason.clone(),
            },
            Self::IntegrityUnresolvable {
                name,
                version,
                reason,
            } => Self::IntegrityUnresolvable {
                name: name.clone(),
                version: version.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use flatlock::core::{ErrorContext, FlatlockError};
///
/// let context = ErrorContext::new(FlatlockError::ConfigError {
///     message: "unknown field `dedupe`".to_string(),
/// })
/// .with_suggestion("Check ~/.flatlock/config.toml for typos");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying flatlock error
    pub error: FlatlockError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`FlatlockError`]
    #[must_use]
    pub const fn new(error: FlatlockError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`FlatlockError`] anywhere in the error chain (so errors wrapped with
/// `.context(..)` are still classified). Anything else is reported generically with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(flatlock_error) = error.chain().find_map(|e| e.downcast_ref::<FlatlockError>()) {
        return create_error_context(flatlock_error);
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(FlatlockError::Other {
        message,
    })
}

fn create_error_context(error: &FlatlockError) -> ErrorContext {
    let (suggestion, details) = match error {
        FlatlockError::ManifestUnavailable {
            name,
            version,
            ..
        } => (
            Some(format!(
                "Check that {name}@{version} exists in the registry and that the package cache is reachable"
            )),
            Some("Every installed node needs its manifest to record dependency ranges"),
        ),
        FlatlockError::IntegrityUnresolvable {
            name,
            ..
        } => (
            Some(format!(
                "Reinstall '{name}' so the tree records an integrity value, or publish a shasum in its manifest"
            )),
            Some("Lock entries require an integrity string; none was found on the node or manifest"),
        ),
        FlatlockError::ConfigError {
            ..
        } => (
            Some(
                "Check ~/.flatlock/config.toml or the file named by FLATLOCK_CONFIG_PATH"
                    .to_string(),
            ),
            None,
        ),
        FlatlockError::IoError(_) => (
            Some("Check that the configuration file exists and is readable".to_string()),
            None,
        ),
        _ => (None, None),
    };

    ErrorContext {
        error: error.clone(),
        suggestion,
        details: details.map(str::to_string),
    }
}
