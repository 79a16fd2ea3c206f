//! Confirmation code lifecycle.

use std::sync::Arc;

use tracing::{Span, info, info_span};
use uuid::Uuid;

use keroosha_core::config::ConfirmationConfig;
use keroosha_core::result::catch_async;
use keroosha_core::traits::PasswordAuthRepository;
use keroosha_core::{ErrorCode, OpResult, UserId};
use keroosha_entity::UserRepository;

use super::{CodeDelivery, ConfirmationCodeKind};

/// Issues confirmation codes and activates accounts.
#[derive(Clone)]
pub struct ConfirmationService {
    users: Arc<dyn UserRepository>,
    delivery: Arc<dyn CodeDelivery>,
    base_url: String,
    logger: Span,
}

impl std::fmt::Debug for ConfirmationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationService")
            .field("delivery", &self.delivery)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ConfirmationService {
    /// Creates the service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        delivery: Arc<dyn CodeDelivery>,
        config: &ConfirmationConfig,
    ) -> Self {
        Self {
            users,
            delivery,
            base_url: config.base_url.clone(),
            logger: info_span!("confirmation"),
        }
    }

    /// Replaces the span collaborator failures are logged under.
    pub fn with_logger(mut self, logger: Span) -> Self {
        self.logger = logger;
        self
    }

    /// Generates a fresh code for `user_id`, delivers its link and stores it,
    /// replacing any previous code.
    ///
    /// The code is stored only after delivery succeeds.
    pub async fn send_new_confirmation_code(
        &self,
        user_id: UserId,
        kind: ConfirmationCodeKind,
    ) -> OpResult<()> {
        let user = catch_async(
            ErrorCode::DatabaseError,
            &self.logger,
            self.users.get_by_id(user_id),
        )
        .await?
        .ok_or(ErrorCode::UserNotFound)?;

        let code = Uuid::new_v4().simple().to_string();
        let link = kind.link(&self.base_url, &code);

        catch_async(
            ErrorCode::DatabaseError,
            &self.logger,
            self.delivery.deliver(&user, kind, &link),
        )
        .await?;

        catch_async(
            ErrorCode::DatabaseError,
            &self.logger,
            self.users.set_confirmation_code(user_id, Some(code)),
        )
        .await?;

        info!(parent: &self.logger, %user_id, %kind, "Confirmation code issued");
        Ok(())
    }

    /// Marks the holder of `code` as confirmed and clears the code.
    pub async fn confirm_user(&self, code: &str) -> OpResult<()> {
        let user_id = catch_async(
            ErrorCode::DatabaseError,
            &self.logger,
            self.users.confirm_by_code(code),
        )
        .await?
        .ok_or(ErrorCode::UserNotFound)?;

        info!(parent: &self.logger, %user_id, "User confirmed");
        Ok(())
    }
}
