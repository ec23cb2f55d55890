//! Diagnostic logging.
//!
//! User-facing status lines go through [`crate::session::IoSession`]; this is
//! the `tracing` side, silent unless `GH_SETUP_LOG` asks for more.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::constants::{defaults, env as env_vars};

/// Build the filter from `GH_SETUP_LOG`, falling back to `warn`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(env_vars::LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(defaults::LOG_FILTER))
}

/// Install the global subscriber writing to stderr. Safe to call twice.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
