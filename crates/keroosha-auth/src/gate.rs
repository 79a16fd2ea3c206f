//! Request-time authentication and role checks.
//!
//! A transport extracts a [`TokenCarrier`] from the incoming call and asks
//! the [`SessionGate`] for a [`GateSession`]. The gate resolves the bearer
//! token to a fresh account and reads the role snapshot from the same
//! token. Authorization uses any-of semantics: a session passes a check if
//! it holds at least one of the required roles.

use http::HeaderMap;
use http::header::AUTHORIZATION;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use keroosha_core::traits::{HasId, HasPasswordAuth, PasswordAuthRepository};
use keroosha_core::{ErrorCode, OpResult};

use crate::manager::AuthManager;

/// Alternative header carrying the raw token.
pub const X_TOKEN_HEADER: &str = "x-token";

/// Something a session token can be read from.
pub trait TokenCarrier {
    /// Raw `Authorization` header value.
    fn authorization(&self) -> Option<&str>;

    /// Raw `X-Token` header value.
    fn x_token(&self) -> Option<&str>;

    /// Token presented by the caller. A bearer `Authorization` header wins
    /// over `X-Token`.
    fn session_token(&self) -> Option<&str> {
        self.authorization()
            .and_then(bearer_token)
            .or_else(|| self.x_token().map(str::trim))
            .filter(|token| !token.is_empty())
    }
}

impl TokenCarrier for HeaderMap {
    fn authorization(&self) -> Option<&str> {
        self.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    }

    fn x_token(&self) -> Option<&str> {
        self.get(X_TOKEN_HEADER).and_then(|v| v.to_str().ok())
    }
}

impl<B> TokenCarrier for http::Request<B> {
    fn authorization(&self) -> Option<&str> {
        self.headers().authorization()
    }

    fn x_token(&self) -> Option<&str> {
        self.headers().x_token()
    }
}

/// Extracts the token from a `Bearer <token>` header value. The scheme
/// name is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Why the gate refused a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    /// No token was presented.
    #[error("Missing session token")]
    MissingToken,
    /// The token did not resolve to an existing account.
    #[error("Invalid or expired session token")]
    Unauthenticated,
}

impl From<GateRejection> for ErrorCode {
    fn from(_: GateRejection) -> Self {
        ErrorCode::AccessDenied
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, Serialize)]
pub struct GateSession<U> {
    /// Account, freshly loaded for this call.
    pub user: U,
    /// Token as presented.
    #[serde(skip_serializing)]
    pub token: String,
    /// Token the caller should use from now on.
    pub renew_token: String,
    /// Roles embedded in the token.
    pub roles: Vec<String>,
}

impl<U> GateSession<U> {
    /// Whether the session holds at least one of `required`.
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        self.roles.iter().any(|role| required.contains(&role.as_str()))
    }

    /// Fails with [`ErrorCode::AccessDenied`] unless [`GateSession::has_any_role`] holds.
    pub fn require_any_role(&self, required: &[&str]) -> OpResult<()> {
        if self.has_any_role(required) {
            Ok(())
        } else {
            Err(ErrorCode::AccessDenied)
        }
    }
}

/// Authenticates calls against an [`AuthManager`].
pub struct SessionGate<U, R: ?Sized> {
    manager: AuthManager<U, R>,
}

impl<U, R: ?Sized> Clone for SessionGate<U, R> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

impl<U, R: ?Sized> std::fmt::Debug for SessionGate<U, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("manager", &self.manager)
            .finish()
    }
}

impl<U, R> SessionGate<U, R>
where
    U: HasId + HasPasswordAuth + Send + Sync + 'static,
    R: PasswordAuthRepository<U> + ?Sized,
{
    /// Creates a gate over `manager`.
    pub fn new(manager: AuthManager<U, R>) -> Self {
        Self { manager }
    }

    /// Resolves the caller behind `carrier`.
    pub async fn authenticate<C>(&self, carrier: &C) -> Result<GateSession<U>, GateRejection>
    where
        C: TokenCarrier + ?Sized,
    {
        let token = carrier.session_token().ok_or(GateRejection::MissingToken)?;

        let Some(authenticated) = self.manager.auth(token).await else {
            debug!(parent: self.manager.logger(), "Session token rejected");
            return Err(GateRejection::Unauthenticated);
        };
        let roles = self.manager.roles(token).await;

        Ok(GateSession {
            user: authenticated.user,
            token: token.to_string(),
            renew_token: authenticated.token,
            roles,
        })
    }

    /// Authenticates and requires at least one of `required`.
    pub async fn authorize<C>(&self, carrier: &C, required: &[&str]) -> OpResult<GateSession<U>>
    where
        C: TokenCarrier + ?Sized,
    {
        let session = self.authenticate(carrier).await?;
        session.require_any_role(required)?;
        Ok(session)
    }
}
