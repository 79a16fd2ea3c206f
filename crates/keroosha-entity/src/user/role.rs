//! Role grants.

use serde::{Deserialize, Serialize};

use keroosha_core::UserId;

/// Known role names.
pub struct Roles;

impl Roles {
    /// Full administrator.
    pub const ADMIN: &'static str = "Admin";
}

/// A single role granted to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Grant record identifier.
    pub id: i64,
    /// Grantee.
    pub user_id: UserId,
    /// Role name.
    pub role: String,
}
