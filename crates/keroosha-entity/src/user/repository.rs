//! Repository ports for users and role grants.

use async_trait::async_trait;

use keroosha_core::traits::PasswordAuthRepository;
use keroosha_core::{AppResult, UserId};

use super::model::{NewUser, User};
use super::role::UserRole;

/// Full user persistence contract.
#[async_trait]
pub trait UserRepository: PasswordAuthRepository<User> {
    /// Inserts a user, failing with a conflict if the email is taken.
    async fn create(&self, new_user: NewUser) -> AppResult<UserId>;

    /// Overwrites a stored user.
    async fn update(&self, user: &User) -> AppResult<()>;

    /// Replaces only the live confirmation code of a user.
    async fn set_confirmation_code(&self, id: UserId, code: Option<String>) -> AppResult<()>;

    /// Marks the holder of `code` as confirmed and clears the code in one
    /// write. Returns the confirmed user's id, or `None` if nobody holds it.
    async fn confirm_by_code(&self, code: &str) -> AppResult<Option<UserId>>;

    /// Stores a new password hash and clears the confirmation code in one
    /// write.
    async fn set_password(&self, id: UserId, password_hash: String) -> AppResult<()>;

    /// Finds the user currently holding `code`.
    async fn find_by_confirm_code(&self, code: &str) -> AppResult<Option<User>>;

    /// Fetches several users at once, skipping unknown ids.
    async fn get_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>>;
}

/// Role grant persistence contract.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Grants a role. Unknown users are ignored.
    async fn attach_role(&self, user_id: UserId, role: &str) -> AppResult<()>;

    /// Replaces every grant of a user with `roles`.
    async fn attach_roles(&self, user_id: UserId, roles: Vec<String>) -> AppResult<()>;

    /// Removes a grant by its record id.
    async fn remove_role(&self, id: i64) -> AppResult<()>;

    /// All grants held by any of `user_ids`.
    async fn user_roles_by_ids(&self, user_ids: &[UserId]) -> AppResult<Vec<UserRole>>;

    /// Whether the user holds `role`.
    async fn user_has_role(&self, user_id: UserId, role: &str) -> AppResult<bool>;
}
