//! In-memory user repository.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use keroosha_core::result::AppResult;
use keroosha_core::traits::PasswordAuthRepository;
use keroosha_core::{AppError, UserId};
use keroosha_entity::{NewUser, User, UserRepository};

#[derive(Debug, Default)]
struct InnerState {
    users: BTreeMap<UserId, User>,
    next_id: i64,
}

/// User table held behind a Tokio read-write lock.
///
/// Email uniqueness is checked and the row inserted under one write lock,
/// so two concurrent registrations of the same email cannot both succeed.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryUserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

#[async_trait]
impl PasswordAuthRepository<User> for MemoryUserRepository {
    async fn get_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == login).cloned())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<UserId> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(format!(
                "Duplicate key: users.email = '{}'",
                new_user.email
            )));
        }

        state.next_id += 1;
        let id = UserId(state.next_id);
        state.users.insert(
            id,
            User {
                id,
                name: new_user.name,
                email: new_user.email,
                confirmed: false,
                confirmation_code: None,
                password_hash: new_user.password_hash,
                avatar_image: None,
            },
        );

        debug!(user_id = %id, "User row inserted");
        Ok(id)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.write().await;

        let duplicate = state
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email);
        if duplicate {
            return Err(AppError::conflict(format!(
                "Duplicate key: users.email = '{}'",
                user.email
            )));
        }

        match state.users.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("User {} not found", user.id))),
        }
    }

    async fn set_confirmation_code(&self, id: UserId, code: Option<String>) -> AppResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        row.confirmation_code = code;
        Ok(())
    }

    async fn confirm_by_code(&self, code: &str) -> AppResult<Option<UserId>> {
        let mut state = self.state.write().await;
        let Some(row) = state
            .users
            .values_mut()
            .find(|u| u.confirmation_code.as_deref() == Some(code))
        else {
            return Ok(None);
        };

        row.confirmed = true;
        row.confirmation_code = None;
        Ok(Some(row.id))
    }

    async fn set_password(&self, id: UserId, password_hash: String) -> AppResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        row.password_hash = password_hash;
        row.confirmation_code = None;
        Ok(())
    }

    async fn find_by_confirm_code(&self, code: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.confirmation_code.as_deref() == Some(code))
            .cloned())
    }

    async fn get_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }
}
