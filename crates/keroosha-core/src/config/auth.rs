//! Credential policy and confirmation throttle configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Longest accepted confirmation throttle window: one year.
pub const MAX_THROTTLE_SECONDS: u64 = 366 * 24 * 60 * 60;

/// Authentication policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum password length accepted at registration and reset.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum seconds between two confirmation or reset code requests per user.
    #[serde(default = "default_throttle")]
    pub confirmation_throttle_seconds: u64,
    /// How often stale throttle entries are swept, in seconds. `0` disables the sweeper.
    #[serde(default = "default_sweep")]
    pub throttle_sweep_interval_seconds: u64,
    /// Display name given to freshly registered users.
    #[serde(default = "default_display_name")]
    pub default_display_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min(),
            confirmation_throttle_seconds: default_throttle(),
            throttle_sweep_interval_seconds: default_sweep(),
            default_display_name: default_display_name(),
        }
    }
}

impl AuthConfig {
    /// The confirmation throttle window, capped at [`MAX_THROTTLE_SECONDS`].
    pub fn throttle_window(&self) -> Duration {
        Duration::seconds(self.confirmation_throttle_seconds.min(MAX_THROTTLE_SECONDS) as i64)
    }

    /// Rejects settings the services cannot represent.
    pub fn validate(&self) -> AppResult<()> {
        if self.confirmation_throttle_seconds > MAX_THROTTLE_SECONDS {
            return Err(AppError::configuration(format!(
                "auth.confirmation_throttle_seconds must be at most {MAX_THROTTLE_SECONDS}, got {}",
                self.confirmation_throttle_seconds
            )));
        }
        if self.password_min_length == 0 {
            return Err(AppError::configuration(
                "auth.password_min_length must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_password_min() -> usize {
    8
}

fn default_throttle() -> u64 {
    60
}

fn default_sweep() -> u64 {
    600
}

fn default_display_name() -> String {
    "Name not set".to_string()
}
