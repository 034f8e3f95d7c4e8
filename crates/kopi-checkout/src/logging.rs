//! # Logging
//!
//! Installs the `tracing` subscriber for binaries and integration hosts.
//!
//! ## Filter Resolution
//! ```text
//! RUST_LOG set? ── yes ──► use it
//!      │
//!      no
//!      ▼
//! "info,kopi=debug"
//! ```

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,kopi=debug";

/// Initializes tracing with [`DEFAULT_FILTER`].
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_FILTER);
}

/// Initializes tracing, falling back to `default_filter` when `RUST_LOG`
/// is unset or unparseable.
pub fn init_tracing_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}
