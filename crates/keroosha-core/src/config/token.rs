//! Session token backend configuration.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Longest accepted token lifetime: ten years.
pub const MAX_TTL_MINUTES: u64 = 10 * 366 * 24 * 60;

/// Which token storage implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// Self-contained HMAC-signed tokens.
    Jwt,
    /// Opaque keys into a process-local table.
    Memory,
}

impl fmt::Display for TokenBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt => write!(f, "jwt"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Token storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Backend selection.
    #[serde(default = "default_backend")]
    pub backend: TokenBackend,
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Issuer claim written to and required on every JWT.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Token lifetime in minutes. Renewal restarts the clock.
    #[serde(default = "default_ttl")]
    pub ttl_minutes: u64,
    /// How often expired server-held tokens are purged, in seconds. `0`
    /// disables the purger. Only the memory backend holds tokens.
    #[serde(default = "default_purge_interval")]
    pub purge_interval_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            jwt_secret: default_jwt_secret(),
            issuer: default_issuer(),
            ttl_minutes: default_ttl(),
            purge_interval_seconds: default_purge_interval(),
        }
    }
}

impl TokenConfig {
    /// Token lifetime, clamped to `1..=`[`MAX_TTL_MINUTES`] minutes.
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes.clamp(1, MAX_TTL_MINUTES) as i64)
    }

    /// Rejects settings the services cannot represent.
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=MAX_TTL_MINUTES).contains(&self.ttl_minutes) {
            return Err(AppError::configuration(format!(
                "token.ttl_minutes must be between 1 and {MAX_TTL_MINUTES}, got {}",
                self.ttl_minutes
            )));
        }
        if self.issuer.trim().is_empty() {
            return Err(AppError::configuration("token.issuer must not be empty"));
        }
        Ok(())
    }
}

fn default_backend() -> TokenBackend {
    TokenBackend::Jwt
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_issuer() -> String {
    "keroosha".to_string()
}

fn default_ttl() -> u64 {
    60 * 24 * 7
}

fn default_purge_interval() -> u64 {
    600
}
