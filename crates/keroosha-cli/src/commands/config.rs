//! Configuration CLI commands.

use clap::{Args, Subcommand};

use keroosha_core::config::AppConfig;
use keroosha_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Summarize the effective configuration
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.token.jwt_secret = mask_secret(&shown.token.jwt_secret);
            shown.dev.password = mask_secret(&shown.dev.password);
            output::print_item(&shown, format);
        }
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success("Configuration is valid");
            output::print_kv("Token backend", &config.token.backend.to_string());
            output::print_kv("Token TTL (minutes)", &config.token.ttl_minutes.to_string());
            output::print_kv(
                "Throttle window (s)",
                &config.auth.confirmation_throttle_seconds.to_string(),
            );
            output::print_kv(
                "Token purge interval (s)",
                &config.token.purge_interval_seconds.to_string(),
            );
            output::print_kv("Confirmation URL", &config.confirmation.base_url);
            if config.token.jwt_secret == "CHANGE_ME_IN_PRODUCTION" {
                output::print_warning("token.jwt_secret still has its default value");
            }
        }
    }

    Ok(())
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}
