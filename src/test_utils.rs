//! Shared test utilities for `guildstore`.

#![allow(dead_code)]

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")), // Default to TRACE for tests if RUST_LOG is not set
        )
        .with_test_writer() // Crucial for `cargo test` output
        .try_init(); // Use try_init to avoid panic if already initialized
}

/// Fresh, private data directory for one test. Dropping the guard deletes
/// the directory and every store file written under it.
pub(crate) fn temp_store_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp data directory for test")
}
