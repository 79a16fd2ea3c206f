//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;

use keroosha_auth::CodeDelivery;
use keroosha_core::UserId;
use keroosha_core::config::{AppConfig, TokenBackend};
use keroosha_core::traits::{ManualClock, PasswordAuthRepository};
use keroosha_database::{MemoryRoleRepository, MemoryUserRepository};
use keroosha_entity::{RoleRepository, User, UserRepository};
use keroosha_identity::IdentityServices;

/// Test application context
pub struct TestApp {
    /// Wired identity services over in-memory storage
    pub services: IdentityServices,
    /// Clock driving the confirmation throttle
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a new test application with the JWT backend
    pub fn new() -> Self {
        Self::with_backend(TokenBackend::Jwt)
    }

    /// Create a new test application with the given token backend
    pub fn with_backend(backend: TokenBackend) -> Self {
        Self::with_config(Self::config(backend))
    }

    /// Create a new test application whose codes go through `delivery`
    pub fn with_delivery(delivery: Arc<dyn CodeDelivery>) -> Self {
        let clock = Arc::new(ManualClock::default());
        let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
        let roles: Arc<dyn RoleRepository> = Arc::new(MemoryRoleRepository::new(users.clone()));
        let services = IdentityServices::assemble(
            &Self::config(TokenBackend::Jwt),
            users,
            roles,
            delivery,
            clock.clone(),
        );
        Self { services, clock }
    }

    fn config(backend: TokenBackend) -> AppConfig {
        let mut config = AppConfig::default();
        config.token.backend = backend;
        config.token.jwt_secret = "integration-test-secret".to_string();
        config
    }

    /// Create a new test application from an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::default());
        let services = IdentityServices::with_clock(&config, clock.clone());
        Self { services, clock }
    }

    /// Register a user and return its id
    pub async fn register(&self, email: &str, password: &str) -> UserId {
        self.services
            .auth
            .register(email, password)
            .await
            .expect("Failed to register test user")
            .id
    }

    /// Register a confirmed user holding `roles`
    pub async fn create_confirmed_user(&self, email: &str, password: &str, roles: &[&str]) -> UserId {
        let id = self.register(email, password).await;

        let mut user = self.user(id).await;
        user.confirmed = true;
        self.services.users.update(&user).await.expect("Failed to confirm test user");

        for role in roles {
            self.services
                .roles
                .attach_role(id, role)
                .await
                .expect("Failed to attach role");
        }
        id
    }

    /// Load a user straight from the repository
    pub async fn user(&self, id: UserId) -> User {
        self.services
            .users
            .get_by_id(id)
            .await
            .expect("Repository failure")
            .expect("User not found")
    }

    /// Confirmation code currently stored for a user
    pub async fn stored_code(&self, id: UserId) -> String {
        self.user(id)
            .await
            .confirmation_code
            .expect("No confirmation code stored")
    }

    /// Move the throttle clock forward
    pub fn advance_seconds(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }
}
