//! Test utilities for flatlock
//!
//! In-memory collaborators and canned dependency trees for unit and integration tests.
//! Enabled for the crate's own tests and, through the `test-utils` feature, for the
//! `tests/` suites.
//!
//! # Example
//!
//! ```rust,no_run
//! use flatlock::test_utils::TreeFixture;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let fixture = TreeFixture::diamond();
//! let mut flattener = fixture.flattener();
//! flattener.flatten_tree(&fixture.root).await?;
//! assert_eq!(flattener.export_entries().len(), 4);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::{StaticIntegrity, StaticManifests, TreeFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise `RUST_LOG`;
/// with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=flatlock=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
