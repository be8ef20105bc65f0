//! Logging macros that cost nothing unless the `tracing` feature is enabled.
//!
//! ```bash
//! # Default build: every macro below expands to nothing.
//! cargo build --release
//!
//! # Watch rotations, fix-up cases and cache behaviour while the integration
//! # tests run; `tests/common` installs the subscriber.
//! RUST_LOG=rbt_map=trace cargo test --features tracing -- --nocapture
//! ```
//!
//! Structural events (rotations that replace the root, fix-up case changes,
//! successor swaps, cache hits and misses) go to `trace`. Arena growth and bulk
//! resets go to `debug`.

#![allow(unused_macros, unused_imports)]

/// Trace-level logging. Compiles to nothing without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging. Compiles to nothing without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
