//! Repository contract consumed by the generic auth manager.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::identity::{HasId, HasPasswordAuth};
use crate::types::id::UserId;

/// Lookup operations needed for password login and token resolution.
///
/// Account-specific write operations live on the concrete repository
/// traits that extend this one.
#[async_trait]
pub trait PasswordAuthRepository<U>: Send + Sync
where
    U: HasId + HasPasswordAuth + Send + Sync + 'static,
{
    /// Find an account by primary key.
    async fn get_by_id(&self, id: UserId) -> AppResult<Option<U>>;

    /// Find an account by its login string.
    async fn find_by_login(&self, login: &str) -> AppResult<Option<U>>;
}
