//! Password login, token issuance and role lookup.

pub mod engine;
pub mod user;

#[cfg(test)]
pub(crate) mod failing;

use serde::{Deserialize, Serialize};

pub use self::engine::{AuthManager, TokenPayload};
pub use self::user::UserAuthManager;

/// An account paired with the token the caller should use from now on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticated<U> {
    /// The resolved account.
    pub user: U,
    /// Freshly minted or renewed session token.
    pub token: String,
}
