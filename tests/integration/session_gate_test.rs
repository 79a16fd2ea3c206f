//! Integration tests for request-time authentication and role checks.

mod helpers;

use http::header::{AUTHORIZATION, HeaderValue};
use http::{HeaderMap, Request};

use keroosha_auth::GateRejection;
use keroosha_core::ErrorCode;
use keroosha_core::config::TokenBackend;
use keroosha_entity::{RoleRepository, Roles};

use helpers::TestApp;

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

async fn login(app: &TestApp, email: &str) -> String {
    app.services.auth.login(email, "password1").await.unwrap().token
}

#[tokio::test]
async fn test_gate_attaches_user_and_roles() {
    let app = TestApp::new();
    let id = app
        .create_confirmed_user("admin@example.com", "password1", &[Roles::ADMIN])
        .await;
    let token = login(&app, "admin@example.com").await;

    let session = app.services.gate.authenticate(&bearer(&token)).await.unwrap();
    assert_eq!(session.user.id, id);
    assert_eq!(session.roles, vec!["Admin".to_string()]);
    assert!(session.require_any_role(&[Roles::ADMIN]).is_ok());
    assert!(app.services.auth.auth(&session.renew_token).await.is_some());
}

#[tokio::test]
async fn test_gate_accepts_x_token_and_requests() {
    let app = TestApp::with_backend(TokenBackend::Memory);
    app.create_confirmed_user("user@example.com", "password1", &[]).await;
    let token = login(&app, "user@example.com").await;

    let request = Request::builder()
        .header("X-Token", token.as_str())
        .body(())
        .unwrap();
    let session = app.services.gate.authenticate(&request).await.unwrap();
    assert_eq!(session.renew_token, token);
}

#[tokio::test]
async fn test_gate_rejections() {
    let app = TestApp::new();
    assert_eq!(
        app.services.gate.authenticate(&HeaderMap::new()).await.unwrap_err(),
        GateRejection::MissingToken
    );
    assert_eq!(
        app.services.gate.authenticate(&bearer("forged")).await.unwrap_err(),
        GateRejection::Unauthenticated
    );
}

#[tokio::test]
async fn test_any_of_role_semantics() {
    let app = TestApp::new();
    app.create_confirmed_user("editor@example.com", "password1", &["Editor"]).await;
    let headers = bearer(&login(&app, "editor@example.com").await);
    let gate = &app.services.gate;

    assert!(gate.authorize(&headers, &["Editor", Roles::ADMIN]).await.is_ok());
    assert_eq!(
        gate.authorize(&headers, &[Roles::ADMIN]).await.unwrap_err(),
        ErrorCode::AccessDenied
    );
}

#[tokio::test]
async fn test_revoked_role_survives_until_relogin() {
    let app = TestApp::new();
    let id = app
        .create_confirmed_user("admin@example.com", "password1", &[Roles::ADMIN])
        .await;
    let headers = bearer(&login(&app, "admin@example.com").await);

    app.services.roles.attach_roles(id, Vec::new()).await.unwrap();
    assert!(app.services.gate.authorize(&headers, &[Roles::ADMIN]).await.is_ok());

    let fresh = bearer(&login(&app, "admin@example.com").await);
    assert_eq!(
        app.services.gate.authorize(&fresh, &[Roles::ADMIN]).await.unwrap_err(),
        ErrorCode::AccessDenied
    );
}

#[tokio::test]
async fn test_token_for_missing_user_is_unauthenticated() {
    let app = TestApp::new();
    app.create_confirmed_user("gone@example.com", "password1", &[]).await;
    let token = login(&app, "gone@example.com").await;

    let other = TestApp::new();
    assert_eq!(
        other.services.gate.authenticate(&bearer(&token)).await.unwrap_err(),
        GateRejection::Unauthenticated
    );
}
