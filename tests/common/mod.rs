//! Shared test setup.
//!
//! ```bash
//! # Print rotations, fix-up cases and cache behaviour for the concrete scenarios.
//! RUST_LOG=rbt_map=trace cargo test --features tracing -- --nocapture
//! ```
//!
//! Without the `tracing` feature the crate emits nothing, so the subscriber stays
//! silent.

#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Ensures the subscriber is installed once per test binary.
static INIT: Once = Once::new();

/// Installs a console subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another harness may already own the global default; keep theirs.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}
