//! Tracing subscriber setup for binaries and tests embedding this crate.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a formatting subscriber filtered to this crate at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns false if a global subscriber
/// was already installed, so calling this more than once is harmless.
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helios_fulltext={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}
