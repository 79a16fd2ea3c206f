//! Account lifecycle flows for the concrete [`User`] type.
//!
//! Everything here returns on the railway: expected failures are
//! [`ErrorCode`]s, collaborator failures are logged and replaced by a
//! pre-chosen code.

use std::sync::Arc;

use tracing::{Span, debug, info};

use keroosha_core::config::AuthConfig;
use keroosha_core::result::{ResultExt, catch_async};
use keroosha_core::traits::{PasswordAuthRepository, TokenStorage};
use keroosha_core::{ErrorCode, OpResult};
use keroosha_entity::{NewUser, RoleRepository, User, UserProfile, UserRepository};

use crate::password::{CredentialPolicy, PasswordEncoder};
use crate::throttle::ConfirmationThrottle;

use super::Authenticated;
use super::engine::AuthManager;

/// User-specific auth manager: registration, confirmation-code login,
/// throttled code requests and password reset on top of [`AuthManager`].
#[derive(Clone)]
pub struct UserAuthManager {
    engine: AuthManager<User, dyn UserRepository>,
    users: Arc<dyn UserRepository>,
    policy: CredentialPolicy,
    throttle: Arc<ConfirmationThrottle>,
    default_display_name: String,
}

impl std::fmt::Debug for UserAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAuthManager")
            .field("engine", &self.engine)
            .field("policy", &self.policy)
            .field("throttle_window", &self.throttle.window())
            .finish()
    }
}

impl UserAuthManager {
    /// Wires the manager from its collaborators.
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        tokens: Arc<dyn TokenStorage>,
        passwords: Arc<dyn PasswordEncoder>,
        throttle: Arc<ConfirmationThrottle>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            engine: AuthManager::new(users.clone(), roles, tokens, passwords),
            users,
            policy: CredentialPolicy::new(config),
            throttle,
            default_display_name: config.default_display_name.clone(),
        }
    }

    /// Replaces the span collaborator failures are logged under.
    pub fn with_logger(mut self, logger: Span) -> Self {
        self.engine = self.engine.with_logger(logger);
        self
    }

    /// The generic engine this manager specializes.
    pub fn engine(&self) -> &AuthManager<User, dyn UserRepository> {
        &self.engine
    }

    /// See [`AuthManager::auth`].
    pub async fn auth(&self, token: &str) -> Option<Authenticated<User>> {
        self.engine.auth(token).await
    }

    /// See [`AuthManager::roles`].
    pub async fn roles(&self, token: &str) -> Vec<String> {
        self.engine.roles(token).await
    }

    /// See [`AuthManager::login`].
    pub async fn login(&self, login: &str, password: &str) -> OpResult<Authenticated<User>> {
        self.engine.login(login, password).await
    }

    /// Logs in a not-yet-confirmed user by the code mailed to them.
    ///
    /// The code is left in place and `confirmed` is not touched: the same
    /// code keeps working until a confirmation or reset replaces it.
    pub async fn login_by_confirmation_code(
        &self,
        code: Option<&str>,
    ) -> OpResult<Authenticated<User>> {
        let code = code.ok_or(ErrorCode::AccessDenied)?;
        let user = self
            .find_by_code(code)
            .await?
            .filter(|u| !u.confirmed)
            .ok_or(ErrorCode::UserNotFound)?;

        self.engine.issue_session(user).await
    }

    /// Creates an account with a normalized email.
    pub async fn register(&self, email: &str, password: &str) -> OpResult<UserProfile> {
        let email = self.policy.validate_email(email)?;
        self.policy.validate_password(password)?;

        let password_hash = self
            .engine
            .passwords()
            .encode(password)
            .or_code(ErrorCode::DatabaseError, self.logger())?;

        let new_user = NewUser {
            email: email.clone(),
            name: self.default_display_name.clone(),
            password_hash,
        };
        let id = catch_async(
            ErrorCode::EmailIsAlreadyRegistered,
            self.logger(),
            self.users.create(new_user),
        )
        .await?;

        info!(parent: self.logger(), user_id = %id, "User registered");
        Ok(UserProfile {
            id,
            email,
            name: self.default_display_name.clone(),
        })
    }

    /// Checks that an unconfirmed user may be sent a new confirmation code.
    ///
    /// On success the throttle records the request; sending is the
    /// caller's job.
    pub async fn can_request_confirmation_code(
        &self,
        email: &str,
        password: &str,
    ) -> OpResult<User> {
        let user = self.find_by_email(email).await?;
        if !self.engine.passwords().verify(&user.password_hash, password) {
            return Err(ErrorCode::InvalidPassword);
        }
        if user.confirmed {
            return Err(ErrorCode::UserAlreadyConfirmed);
        }

        self.throttle.try_acquire(user.id)?;
        debug!(parent: self.logger(), user_id = %user.id, "Confirmation code request allowed");
        Ok(user)
    }

    /// Checks that a confirmed user may be sent a password reset code.
    pub async fn can_reset_password(&self, email: &str) -> OpResult<User> {
        let user = self.find_by_email(email).await?;
        if !user.confirmed {
            return Err(ErrorCode::UserNotConfirmed);
        }

        self.throttle.try_acquire(user.id)?;
        debug!(parent: self.logger(), user_id = %user.id, "Password reset request allowed");
        Ok(user)
    }

    /// Sets a new password for the confirmed user holding `code`, consumes
    /// the code and returns a fresh session.
    pub async fn change_password(
        &self,
        code: Option<&str>,
        new_password: &str,
    ) -> OpResult<Authenticated<User>> {
        let code = code.ok_or(ErrorCode::AccessDenied)?;
        let mut user = self
            .find_by_code(code)
            .await?
            .filter(|u| u.confirmed)
            .ok_or(ErrorCode::UserNotFound)?;

        self.policy.validate_password(new_password)?;
        user.password_hash = self
            .engine
            .passwords()
            .encode(new_password)
            .or_code(ErrorCode::DatabaseError, self.logger())?;
        user.confirmation_code = None;

        catch_async(
            ErrorCode::DatabaseError,
            self.logger(),
            self.users.set_password(user.id, user.password_hash.clone()),
        )
        .await?;
        info!(parent: self.logger(), user_id = %user.id, "Password changed");

        self.engine.issue_session(user).await
    }

    fn logger(&self) -> &Span {
        self.engine.logger()
    }

    async fn find_by_email(&self, email: &str) -> OpResult<User> {
        let email = self.policy.validate_email(email)?;
        catch_async(
            ErrorCode::DatabaseError,
            self.logger(),
            self.users.find_by_login(&email),
        )
        .await?
        .ok_or(ErrorCode::UserNotFound)
    }

    async fn find_by_code(&self, code: &str) -> OpResult<Option<User>> {
        catch_async(
            ErrorCode::DatabaseError,
            self.logger(),
            self.users.find_by_confirm_code(code),
        )
        .await
    }
}
