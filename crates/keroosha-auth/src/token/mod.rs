//! Server-held token backend, backend selection and expiry purging.

pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use keroosha_core::config::{TokenBackend, TokenConfig};
use keroosha_core::traits::{Clock, TokenStorage};

use crate::jwt::JwtTokenStorage;

pub use memory::MemoryTokenStorage;

/// Builds the token backend named by the configuration.
///
/// `clock` drives expiry of server-held tokens; signed tokens always use
/// the wall clock.
pub fn build_token_storage(config: &TokenConfig, clock: Arc<dyn Clock>) -> Arc<dyn TokenStorage> {
    info!(backend = %config.backend, ttl_minutes = config.ttl_minutes, "Initializing token storage");
    match config.backend {
        TokenBackend::Jwt => Arc::new(JwtTokenStorage::new(config)),
        TokenBackend::Memory => Arc::new(MemoryTokenStorage::with_clock(config, clock)),
    }
}

/// Runs [`TokenStorage::purge_expired`] every `interval` until the handle is aborted.
pub fn spawn_token_purger(tokens: Arc<dyn TokenStorage>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting expired token purger");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = tokens.purge_expired();
            if removed > 0 {
                debug!(removed, "Purged expired session tokens");
            }
        }
    })
}
