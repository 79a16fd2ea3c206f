//! End-to-end check of the identity services on in-memory storage.

use serde::Serialize;
use tabled::Tabled;

use keroosha_core::config::AppConfig;
use keroosha_core::error::AppError;
use keroosha_entity::Roles;
use keroosha_identity::IdentityServices;

use crate::output::{self, OutputFormat};

/// One smoke step
#[derive(Debug, Serialize, Tabled)]
struct StepRow {
    /// Step name
    step: String,
    /// Outcome
    result: String,
}

impl StepRow {
    fn new(step: &str, result: impl Into<String>) -> Self {
        Self {
            step: step.to_string(),
            result: result.into(),
        }
    }
}

/// Execute the smoke run
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let services = IdentityServices::from_config(config);
    let mut rows = Vec::new();

    let id = services.seed_dev_user(&config.dev).await?;
    rows.push(StepRow::new("seed", format!("user {}", id)));

    let session = services
        .auth
        .login(&config.dev.email, &config.dev.password)
        .await
        .map_err(super::rejected)?;
    rows.push(StepRow::new("login", session.user.email.clone()));

    let roles = services.auth.roles(&session.token).await;
    rows.push(StepRow::new("roles", roles.join(", ")));

    let resolved = services
        .auth
        .auth(&session.token)
        .await
        .ok_or_else(|| AppError::internal("Fresh token did not resolve"))?;
    let rotated = if resolved.token == session.token {
        "same token"
    } else {
        "rotated"
    };
    rows.push(StepRow::new("auth", rotated));

    let admin = roles.iter().any(|r| r == Roles::ADMIN);
    rows.push(StepRow::new("admin", admin.to_string()));

    output::print_list(&rows, format);
    if admin {
        output::print_success("Smoke run passed");
        Ok(())
    } else {
        Err(AppError::internal("Seeded user is missing the Admin role"))
    }
}
