//! Outbound channel for confirmation links.

use std::fmt;

use async_trait::async_trait;
use tracing::info;

use keroosha_core::result::AppResult;
use keroosha_entity::User;

use super::ConfirmationCodeKind;

/// Sends a confirmation link to a user.
#[async_trait]
pub trait CodeDelivery: Send + Sync + fmt::Debug + 'static {
    /// Delivers `link` to `recipient`.
    async fn deliver(
        &self,
        recipient: &User,
        kind: ConfirmationCodeKind,
        link: &str,
    ) -> AppResult<()>;
}

/// Development delivery that writes the link to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCodeDelivery;

#[async_trait]
impl CodeDelivery for LogCodeDelivery {
    async fn deliver(
        &self,
        recipient: &User,
        kind: ConfirmationCodeKind,
        link: &str,
    ) -> AppResult<()> {
        info!(
            user_id = %recipient.id,
            email = %recipient.email,
            %kind,
            link,
            "{}",
            kind.phrase()
        );
        Ok(())
    }
}
