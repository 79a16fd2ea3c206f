//! Development database seed configuration.

use serde::{Deserialize, Serialize};

/// Controls the sample account created in development setups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    /// Whether to create the sample account on startup.
    #[serde(default)]
    pub seed: bool,
    /// Email of the sample account.
    #[serde(default = "default_email")]
    pub email: String,
    /// Display name of the sample account.
    #[serde(default = "default_name")]
    pub name: String,
    /// Plaintext password of the sample account.
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            seed: false,
            email: default_email(),
            name: default_name(),
            password: default_password(),
        }
    }
}

fn default_email() -> String {
    "user@example.com".to_string()
}

fn default_name() -> String {
    "John Doe".to_string()
}

fn default_password() -> String {
    "password123".to_string()
}
