//! Capability traits an account type implements to be managed by the auth engine.

use crate::types::id::UserId;

/// Exposes the integer identity of a record.
pub trait HasId {
    /// Primary key.
    fn id(&self) -> UserId;
}

/// Exposes the credentials used for password login.
pub trait HasPasswordAuth {
    /// Login string (for users, the normalized email).
    fn login(&self) -> &str;

    /// Stored salted password hash.
    fn password_hash(&self) -> &str;
}
