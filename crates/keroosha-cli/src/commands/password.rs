//! Password CLI commands.

use clap::{Args, Subcommand};

use keroosha_auth::{Argon2PasswordEncoder, CredentialPolicy, PasswordEncoder};
use keroosha_core::config::AppConfig;
use keroosha_core::error::AppError;

use crate::output;

/// Arguments for password commands
#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Password subcommand
    #[command(subcommand)]
    pub command: PasswordCommand,
}

/// Password subcommands
#[derive(Debug, Subcommand)]
pub enum PasswordCommand {
    /// Check a password against the policy and print its Argon2id hash
    Encode {
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Verify a password against a stored hash
    Verify {
        /// PHC-format hash
        #[arg(long)]
        hash: String,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute password commands
pub async fn execute(args: &PasswordArgs, config: &AppConfig) -> Result<(), AppError> {
    let encoder = Argon2PasswordEncoder::new();

    match &args.command {
        PasswordCommand::Encode { password } => {
            let password = super::password_or_prompt(password.as_ref(), "Password", true)?;
            CredentialPolicy::new(&config.auth)
                .validate_password(&password)
                .map_err(super::rejected)?;

            let hash = encoder.encode(&password)?;
            println!("{}", hash);
        }
        PasswordCommand::Verify { hash, password } => {
            let password = super::password_or_prompt(password.as_ref(), "Password", false)?;
            if encoder.verify(hash, &password) {
                output::print_success("Password matches");
            } else {
                return Err(AppError::validation("Password does not match"));
            }
        }
    }

    Ok(())
}
