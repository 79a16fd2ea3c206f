//! CLI command definitions and dispatch.

pub mod config;
pub mod password;
pub mod smoke;
pub mod token;

use clap::{Parser, Subcommand};

use keroosha_core::config::AppConfig;
use keroosha_core::error::AppError;
use keroosha_core::ErrorCode;

use crate::output::OutputFormat;

/// Keroosha identity administration
#[derive(Debug, Parser)]
#[command(name = "keroosha", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to load
    #[arg(short, long, env = "KEROOSHA_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Password hashing and policy checks
    Password(password::PasswordArgs),
    /// Session token issuance and inspection
    Token(token::TokenArgs),
    /// Seed the development user and walk through login and gate checks
    Smoke,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Password(args) => password::execute(args, config).await,
            Commands::Token(args) => token::execute(args, config, self.format).await,
            Commands::Smoke => smoke::execute(config, self.format).await,
            Commands::Config(args) => config::execute(args, config, self.format).await,
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(dir: &str, env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_from(dir, env)
}

/// Helper: turn a rejected operation into a CLI error
pub fn rejected(code: ErrorCode) -> AppError {
    AppError::validation(code.display_full().to_string())
}

/// Helper: read a password from the argument or prompt for it
pub fn password_or_prompt(
    value: Option<&String>,
    prompt: &str,
    confirm: bool,
) -> Result<String, AppError> {
    if let Some(p) = value {
        return Ok(p.clone());
    }

    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
