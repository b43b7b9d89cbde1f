//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the census tracing/logging system.
///
/// Reads the `CENSUS_LOG` environment variable for per-module log levels.
/// Format: `CENSUS_LOG=census_scanner=debug,census_storage=warn`
///
/// Falls back to `census=info` if `CENSUS_LOG` is not set or is invalid.
/// Logs go to stderr; stdout is reserved for reports.
///
/// Calling this more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("census=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .with(filter)
            .init();
    });
}
