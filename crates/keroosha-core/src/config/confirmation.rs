//! Confirmation link configuration.

use serde::{Deserialize, Serialize};

/// Settings used to build confirmation and password-reset links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Public base URL of the front end; links are `{base_url}{path}?code=...`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
