//! In-memory token table for single-node deployments.

use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use keroosha_core::config::TokenConfig;
use keroosha_core::result::AppResult;
use keroosha_core::traits::{Clock, LoadedToken, SystemClock, TokenStorage};

/// Number of random bytes in a token key.
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct Entry {
    payload: Value,
    expires_at: DateTime<Utc>,
}

/// Opaque-key token backend.
///
/// Tokens are random keys into a process-local table. Loading never
/// rotates: the renew token is the presented token. Tokens from another
/// instance are unknown here and do not load.
#[derive(Debug, Clone)]
pub struct MemoryTokenStorage {
    entries: Arc<DashMap<String, Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryTokenStorage {
    /// Creates an empty table using the wall clock.
    pub fn new(config: &TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an empty table driven by `clock`.
    pub fn with_clock(config: &TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: config.ttl(),
            clock,
        }
    }

    /// Number of live and not-yet-purged tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn generate_key() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn create_raw(&self, payload: Value) -> AppResult<String> {
        let key = Self::generate_key();
        let expires_at = self.clock.now() + self.ttl;
        self.entries.insert(key.clone(), Entry { payload, expires_at });
        Ok(key)
    }

    async fn load_raw(&self, token: &str) -> Option<LoadedToken<Value>> {
        let now = self.clock.now();
        let payload = {
            let entry = self.entries.get(token)?;
            if entry.expires_at > now {
                Some(entry.payload.clone())
            } else {
                None
            }
        };

        match payload {
            Some(data) => Some(LoadedToken {
                data,
                renew_token: token.to_string(),
            }),
            None => {
                self.entries.remove(token);
                debug!("Dropped expired token on load");
                None
            }
        }
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Purged expired tokens");
        }
        removed
    }
}
