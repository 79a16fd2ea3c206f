//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a serde default so a missing file still
//! yields a usable configuration.

pub mod auth;
pub mod confirmation;
pub mod dev;
pub mod logging;
pub mod token;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::confirmation::ConfirmationConfig;
pub use self::dev::DevConfig;
pub use self::logging::LoggingConfig;
pub use self::token::{TokenBackend, TokenConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential policy and throttle settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session token backend settings.
    #[serde(default)]
    pub token: TokenConfig,
    /// Confirmation link settings.
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Development seed settings.
    #[serde(default)]
    pub dev: DevConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// and environment variables prefixed with `KEROOSHA__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] with an explicit configuration directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KEROOSHA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field bounds that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.token.validate()
    }
}
