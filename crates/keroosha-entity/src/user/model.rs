//! User entity model.

use serde::{Deserialize, Serialize};

use keroosha_core::UserId;
use keroosha_core::traits::{HasId, HasPasswordAuth};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email, doubles as the login.
    pub email: String,
    /// Whether the email has been confirmed. Flips to `true` once.
    pub confirmed: bool,
    /// The single live confirmation or reset code, if any.
    #[serde(skip_serializing)]
    pub confirmation_code: Option<String>,
    /// Argon2 password hash.
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    /// Blob id of the avatar image.
    pub avatar_image: Option<i64>,
}

impl HasId for User {
    fn id(&self) -> UserId {
        self.id
    }
}

impl HasPasswordAuth for User {
    fn login(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

/// Profile returned by registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Assigned identifier.
    pub id: UserId,
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub name: String,
}
