//! In-memory role grant repository.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use keroosha_core::UserId;
use keroosha_core::result::AppResult;
use keroosha_entity::{RoleRepository, UserRepository, UserRole};

#[derive(Debug, Default)]
struct InnerState {
    grants: Vec<UserRole>,
    next_id: i64,
}

impl InnerState {
    fn push(&mut self, user_id: UserId, role: String) {
        self.next_id += 1;
        let id = self.next_id;
        self.grants.push(UserRole { id, user_id, role });
    }
}

/// Role grants held in insertion order.
#[derive(Clone)]
pub struct MemoryRoleRepository {
    users: Arc<dyn UserRepository>,
    state: Arc<RwLock<InnerState>>,
}

impl std::fmt::Debug for MemoryRoleRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRoleRepository").finish()
    }
}

impl MemoryRoleRepository {
    /// Creates an empty repository; `users` is consulted when attaching roles.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            state: Arc::new(RwLock::new(InnerState::default())),
        }
    }
}

#[async_trait]
impl RoleRepository for MemoryRoleRepository {
    async fn attach_role(&self, user_id: UserId, role: &str) -> AppResult<()> {
        if self.users.get_by_id(user_id).await?.is_none() {
            warn!(%user_id, role, "Ignoring role grant for unknown user");
            return Ok(());
        }

        self.state.write().await.push(user_id, role.to_string());
        debug!(%user_id, role, "Role attached");
        Ok(())
    }

    async fn attach_roles(&self, user_id: UserId, roles: Vec<String>) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.grants.retain(|g| g.user_id != user_id);
        for role in roles {
            state.push(user_id, role);
        }
        Ok(())
    }

    async fn remove_role(&self, id: i64) -> AppResult<()> {
        self.state.write().await.grants.retain(|g| g.id != id);
        Ok(())
    }

    async fn user_roles_by_ids(&self, user_ids: &[UserId]) -> AppResult<Vec<UserRole>> {
        let state = self.state.read().await;
        Ok(state
            .grants
            .iter()
            .filter(|g| user_ids.contains(&g.user_id))
            .cloned()
            .collect())
    }

    async fn user_has_role(&self, user_id: UserId, role: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .grants
            .iter()
            .any(|g| g.user_id == user_id && g.role == role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryUserRepository;
    use keroosha_entity::NewUser;

    async fn setup() -> (MemoryRoleRepository, UserId) {
        let users = Arc::new(MemoryUserRepository::new());
        let id = users
            .create(NewUser {
                email: "a@example.com".into(),
                name: "A".into(),
                password_hash: "h".into(),
            })
            .await
            .unwrap();
        (MemoryRoleRepository::new(users), id)
    }

    #[tokio::test]
    async fn test_attach_and_query() {
        let (roles, id) = setup().await;
        roles.attach_role(id, "Admin").await.unwrap();
        roles.attach_role(id, "Editor").await.unwrap();

        let grants = roles.user_roles_by_ids(&[id]).await.unwrap();
        let names: Vec<_> = grants.iter().map(|g| g.role.as_str()).collect();
        assert_eq!(names, ["Admin", "Editor"]);
        assert!(roles.user_has_role(id, "Admin").await.unwrap());
        assert!(!roles.user_has_role(id, "Root").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_user_is_ignored() {
        let (roles, _) = setup().await;
        roles.attach_role(UserId(42), "Admin").await.unwrap();
        assert!(roles.user_roles_by_ids(&[UserId(42)]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attach_roles_replaces_and_remove() {
        let (roles, id) = setup().await;
        roles.attach_role(id, "Admin").await.unwrap();
        roles
            .attach_roles(id, vec!["Editor".into(), "Viewer".into()])
            .await
            .unwrap();

        let grants = roles.user_roles_by_ids(&[id]).await.unwrap();
        assert_eq!(grants.len(), 2);
        roles.remove_role(grants[0].id).await.unwrap();
        let left = roles.user_roles_by_ids(&[id]).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].role, "Viewer");
    }
}
