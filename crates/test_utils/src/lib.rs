//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims worker test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for the standing directory cast
//! - `builders`: Builder patterns for test data construction
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use generators::*;

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init()
        .ok();
});

/// Installs a tracing subscriber for the current test process
///
/// Idempotent: the first caller wins, later calls are no-ops. Set `RUST_LOG`
/// to surface worker and service logs while a test runs.
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
