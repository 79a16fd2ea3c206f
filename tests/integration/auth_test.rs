//! Integration tests for password login, token resolution and role snapshots.

mod helpers;

use keroosha_core::ErrorCode;
use keroosha_core::config::{AppConfig, TokenBackend};
use keroosha_core::traits::TokenStorageExt;
use keroosha_entity::{RoleRepository, Roles};

use helpers::TestApp;

#[tokio::test]
async fn test_login_success_embeds_current_roles() {
    let app = TestApp::new();
    app.create_confirmed_user("ann@example.com", "password1", &[Roles::ADMIN, "Editor"])
        .await;

    let session = app
        .services
        .auth
        .login("ann@example.com", "password1")
        .await
        .unwrap();

    assert_eq!(session.user.email, "ann@example.com");
    assert_eq!(
        app.services.auth.roles(&session.token).await,
        vec!["Admin".to_string(), "Editor".to_string()]
    );
}

#[tokio::test]
async fn test_login_failures_use_distinct_codes() {
    let app = TestApp::new();
    app.create_confirmed_user("ann@example.com", "password1", &[]).await;

    assert_eq!(
        app.services.auth.login("ann@example.com", "wrong-pass").await.unwrap_err(),
        ErrorCode::InvalidPassword
    );
    assert_eq!(
        app.services.auth.login("nobody@example.com", "password1").await.unwrap_err(),
        ErrorCode::UserNotFound
    );
}

#[tokio::test]
async fn test_auth_rejects_unknown_and_malformed_tokens() {
    for backend in [TokenBackend::Jwt, TokenBackend::Memory] {
        let app = TestApp::with_backend(backend);
        assert!(app.services.auth.auth("").await.is_none());
        assert!(app.services.auth.auth("never-issued").await.is_none());
        assert!(app.services.auth.auth("a.b.c").await.is_none());
        assert!(app.services.auth.roles("never-issued").await.is_empty());
    }
}

#[tokio::test]
async fn test_auth_rejects_tokens_from_another_instance() {
    let app = TestApp::new();
    app.create_confirmed_user("ann@example.com", "password1", &[]).await;

    let mut other_config = AppConfig::default();
    other_config.token.jwt_secret = "a-completely-different-secret".to_string();
    let other = TestApp::with_config(other_config);
    other.create_confirmed_user("ann@example.com", "password1", &[]).await;
    let foreign = other
        .services
        .auth
        .login("ann@example.com", "password1")
        .await
        .unwrap()
        .token;
    assert!(app.services.auth.auth(&foreign).await.is_none());

    let memory_a = TestApp::with_backend(TokenBackend::Memory);
    let memory_b = TestApp::with_backend(TokenBackend::Memory);
    memory_b.create_confirmed_user("bob@example.com", "password1", &[]).await;
    let token_b = memory_b
        .services
        .auth
        .login("bob@example.com", "password1")
        .await
        .unwrap()
        .token;
    assert!(memory_a.services.auth.auth(&token_b).await.is_none());
}

#[tokio::test]
async fn test_renew_token_rotates_only_for_signed_backend() {
    let jwt = TestApp::with_backend(TokenBackend::Jwt);
    jwt.create_confirmed_user("ann@example.com", "password1", &[]).await;
    let token = jwt.services.auth.login("ann@example.com", "password1").await.unwrap().token;
    let resolved = jwt.services.auth.auth(&token).await.unwrap();
    assert_ne!(resolved.token, token);
    assert_eq!(resolved.user.email, "ann@example.com");

    let memory = TestApp::with_backend(TokenBackend::Memory);
    memory.create_confirmed_user("ann@example.com", "password1", &[]).await;
    let token = memory.services.auth.login("ann@example.com", "password1").await.unwrap().token;
    let resolved = memory.services.auth.auth(&token).await.unwrap();
    assert_eq!(resolved.token, token);
}

#[tokio::test]
async fn test_roles_are_idempotent_and_snapshotted() {
    let app = TestApp::new();
    let id = app
        .create_confirmed_user("ann@example.com", "password1", &[Roles::ADMIN])
        .await;
    let token = app.services.auth.login("ann@example.com", "password1").await.unwrap().token;

    let first = app.services.auth.roles(&token).await;
    let second = app.services.auth.roles(&token).await;
    assert_eq!(first, second);

    app.services.roles.attach_roles(id, Vec::new()).await.unwrap();
    assert_eq!(app.services.auth.roles(&token).await, first);

    let relogin = app.services.auth.login("ann@example.com", "password1").await.unwrap().token;
    assert!(app.services.auth.roles(&relogin).await.is_empty());
}

#[tokio::test]
async fn test_token_payload_round_trip() {
    for backend in [TokenBackend::Jwt, TokenBackend::Memory] {
        let app = TestApp::with_backend(backend);
        let payload = serde_json::json!({ "user_id": 7, "roles": ["Admin"] });

        let token = app.services.tokens.create_token(&payload).await.unwrap();
        let loaded = app
            .services
            .tokens
            .load_token::<serde_json::Value>(&token)
            .await
            .unwrap();
        assert_eq!(loaded.data, payload);
    }
}
