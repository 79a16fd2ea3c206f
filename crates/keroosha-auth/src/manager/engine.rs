//! Generic authentication engine over any account type.
//!
//! Roles are snapshotted into the token when it is minted. `auth` and
//! `roles` read them back from the token without querying the role
//! repository, so a role revoked after login stays effective until the
//! user logs in again.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{Span, debug, info, info_span, warn};

use keroosha_core::result::{ResultExt, catch_async};
use keroosha_core::traits::{
    HasId, HasPasswordAuth, PasswordAuthRepository, TokenStorage, TokenStorageExt,
};
use keroosha_core::{ErrorCode, OpResult, UserId};
use keroosha_entity::RoleRepository;

use crate::password::PasswordEncoder;

use super::Authenticated;

/// Identity and role snapshot carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Account identity.
    pub user_id: UserId,
    /// Roles held at mint time, in repository order.
    pub roles: Vec<String>,
}

/// Stateless auth engine; all state lives in the injected collaborators.
pub struct AuthManager<U, R: ?Sized> {
    repo: Arc<R>,
    roles: Arc<dyn RoleRepository>,
    tokens: Arc<dyn TokenStorage>,
    passwords: Arc<dyn PasswordEncoder>,
    logger: Span,
    _user: PhantomData<fn() -> U>,
}

impl<U, R: ?Sized> Clone for AuthManager<U, R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            roles: self.roles.clone(),
            tokens: self.tokens.clone(),
            passwords: self.passwords.clone(),
            logger: self.logger.clone(),
            _user: PhantomData,
        }
    }
}

impl<U, R: ?Sized> std::fmt::Debug for AuthManager<U, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl<U, R> AuthManager<U, R>
where
    U: HasId + HasPasswordAuth + Send + Sync + 'static,
    R: PasswordAuthRepository<U> + ?Sized,
{
    /// Creates the engine from its collaborators.
    pub fn new(
        repo: Arc<R>,
        roles: Arc<dyn RoleRepository>,
        tokens: Arc<dyn TokenStorage>,
        passwords: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            repo,
            roles,
            tokens,
            passwords,
            logger: info_span!("auth_manager"),
            _user: PhantomData,
        }
    }

    /// Replaces the span collaborator failures are logged under.
    pub fn with_logger(mut self, logger: Span) -> Self {
        self.logger = logger;
        self
    }

    /// Span collaborator failures are logged under.
    pub fn logger(&self) -> &Span {
        &self.logger
    }

    /// Password encoder shared with specializations.
    pub fn passwords(&self) -> &Arc<dyn PasswordEncoder> {
        &self.passwords
    }

    /// Resolves a token to a freshly loaded account and the renew token.
    ///
    /// Returns `None` if the token does not load, the account no longer
    /// exists, or the repository fails.
    pub async fn auth(&self, token: &str) -> Option<Authenticated<U>> {
        let loaded = self.tokens.load_token::<TokenPayload>(token).await?;
        let user_id = loaded.data.user_id;

        match self.repo.get_by_id(user_id).await {
            Ok(Some(user)) => Some(Authenticated {
                user,
                token: loaded.renew_token,
            }),
            Ok(None) => {
                debug!(parent: &self.logger, %user_id, "Token refers to a missing user");
                None
            }
            Err(e) => {
                warn!(parent: &self.logger, %user_id, error = %e, "User lookup failed during auth");
                None
            }
        }
    }

    /// Roles embedded in the token at mint time; empty for an invalid token.
    pub async fn roles(&self, token: &str) -> Vec<String> {
        self.tokens
            .load_token::<TokenPayload>(token)
            .await
            .map(|loaded| loaded.data.roles)
            .unwrap_or_default()
    }

    /// Password login.
    pub async fn login(&self, login: &str, password: &str) -> OpResult<Authenticated<U>> {
        let user = catch_async(
            ErrorCode::DatabaseError,
            &self.logger,
            self.repo.find_by_login(login),
        )
        .await?
        .ok_or(ErrorCode::UserNotFound)?;

        if !self.passwords.verify(user.password_hash(), password) {
            debug!(parent: &self.logger, user_id = %user.id(), "Login rejected: wrong password");
            return Err(ErrorCode::InvalidPassword);
        }

        let session = self.issue_session(user).await?;
        info!(parent: &self.logger, user_id = %session.user.id(), "User logged in");
        Ok(session)
    }

    /// Current role names of `user_id`, read from the role repository.
    pub async fn current_roles(&self, user_id: UserId) -> OpResult<Vec<String>> {
        let grants = catch_async(
            ErrorCode::DatabaseError,
            &self.logger,
            self.roles.user_roles_by_ids(&[user_id]),
        )
        .await?;

        Ok(grants
            .into_iter()
            .filter(|grant| grant.user_id == user_id)
            .map(|grant| grant.role)
            .collect())
    }

    /// Fetches the current roles and mints a token for `user`.
    pub(crate) async fn issue_session(&self, user: U) -> OpResult<Authenticated<U>> {
        let roles = self.current_roles(user.id()).await?;
        let token = self.create_token(&user, roles).await?;
        Ok(Authenticated { user, token })
    }

    /// Mints a token embedding the identity of `user` and `roles`.
    pub(crate) async fn create_token(&self, user: &U, roles: Vec<String>) -> OpResult<String> {
        let payload = TokenPayload {
            user_id: user.id(),
            roles,
        };
        self.tokens
            .create_token(&payload)
            .await
            .or_code(ErrorCode::DatabaseError, &self.logger)
    }
}
