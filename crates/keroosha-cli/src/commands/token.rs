//! Token CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use keroosha_auth::build_token_storage;
use keroosha_auth::manager::TokenPayload;
use keroosha_core::UserId;
use keroosha_core::config::{AppConfig, TokenBackend};
use keroosha_core::error::AppError;
use keroosha_core::traits::{SystemClock, TokenStorageExt};

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Mint a session token for a user id and role set
    Issue {
        /// User id embedded in the token
        #[arg(short, long)]
        user_id: UserId,
        /// Role embedded in the token (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,
    },
    /// Decode a session token and print its payload
    Inspect {
        /// Token to inspect
        token: String,
    },
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if config.token.backend == TokenBackend::Memory {
        output::print_warning("Memory tokens only live as long as this process");
    }
    let tokens = build_token_storage(&config.token, Arc::new(SystemClock));

    match &args.command {
        TokenCommand::Issue { user_id, roles } => {
            let token = tokens
                .create_token(&TokenPayload {
                    user_id: *user_id,
                    roles: roles.clone(),
                })
                .await?;
            println!("{}", token);
        }
        TokenCommand::Inspect { token } => {
            let loaded = tokens
                .load_token::<TokenPayload>(token)
                .await
                .ok_or_else(|| AppError::validation("Token is invalid, expired or foreign"))?;

            output::print_item(&loaded.data, format);
            output::print_kv("Renew token", &loaded.renew_token);
        }
    }

    Ok(())
}
