//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use keroosha_core::config::LoggingConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Any format other
/// than `json` falls back to the pretty human-readable output.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
