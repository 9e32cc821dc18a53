//! Tracing setup.
//!
//! One-line subscriber installation for binaries and examples embedding the
//! runtime. Library code only ever emits through the `tracing` macros and
//! never installs a subscriber itself.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default "info").
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
