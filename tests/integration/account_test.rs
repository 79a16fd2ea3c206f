//! Integration tests for registration, confirmation and password reset.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use keroosha_auth::{CodeDelivery, ConfirmationCodeKind};
use keroosha_core::ErrorCode;
use keroosha_core::result::AppResult;
use keroosha_entity::{User, UserRepository};

use helpers::TestApp;

/// Delivery port that takes a while to hand the code off.
#[derive(Debug)]
struct SlowDelivery;

#[async_trait]
impl CodeDelivery for SlowDelivery {
    async fn deliver(&self, _recipient: &User, _kind: ConfirmationCodeKind, _link: &str) -> AppResult<()> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_register_normalizes_email_once() {
    let app = TestApp::new();

    let profile = app.services.auth.register("A@B.com ", "password1").await.unwrap();
    assert_eq!(profile.email, "a@b.com");
    assert_eq!(profile.name, "Name not set");

    assert_eq!(
        app.services.auth.register("A@B.com ", "password1").await.unwrap_err(),
        ErrorCode::EmailIsAlreadyRegistered
    );
    assert_eq!(
        app.services.auth.register("a@b.com", "password2").await.unwrap_err(),
        ErrorCode::EmailIsAlreadyRegistered
    );
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();
    assert_eq!(
        app.services.auth.register("new@example.com", "short").await.unwrap_err(),
        ErrorCode::WeakPassword
    );
    assert_eq!(
        app.services.auth.register("not-an-email", "password1").await.unwrap_err(),
        ErrorCode::InvalidEmail
    );
}

#[tokio::test]
async fn test_confirmation_requests_are_throttled_for_sixty_seconds() {
    let app = TestApp::new();
    app.register("new@example.com", "password1").await;
    let auth = &app.services.auth;

    assert!(auth.can_request_confirmation_code("new@example.com", "password1").await.is_ok());
    app.advance_seconds(30);
    assert_eq!(
        auth.can_request_confirmation_code("new@example.com", "password1").await.unwrap_err(),
        ErrorCode::UserConfirmationEmailSentTooOften
    );
    app.advance_seconds(31);
    assert!(auth.can_request_confirmation_code("new@example.com", "password1").await.is_ok());
}

#[tokio::test]
async fn test_confirmation_request_checks() {
    let app = TestApp::new();
    app.register("new@example.com", "password1").await;
    app.create_confirmed_user("done@example.com", "password1", &[]).await;
    let auth = &app.services.auth;

    assert_eq!(
        auth.can_request_confirmation_code("bad", "password1").await.unwrap_err(),
        ErrorCode::InvalidEmail
    );
    assert_eq!(
        auth.can_request_confirmation_code("ghost@example.com", "password1").await.unwrap_err(),
        ErrorCode::UserNotFound
    );
    assert_eq!(
        auth.can_request_confirmation_code("new@example.com", "wrong-pass").await.unwrap_err(),
        ErrorCode::InvalidPassword
    );
    assert_eq!(
        auth.can_request_confirmation_code("done@example.com", "password1").await.unwrap_err(),
        ErrorCode::UserAlreadyConfirmed
    );
}

#[tokio::test]
async fn test_reset_requires_confirmed_user_and_shares_throttle() {
    let app = TestApp::new();
    app.register("new@example.com", "password1").await;
    app.create_confirmed_user("done@example.com", "password1", &[]).await;
    let auth = &app.services.auth;

    assert_eq!(
        auth.can_reset_password("new@example.com").await.unwrap_err(),
        ErrorCode::UserNotConfirmed
    );
    assert!(auth.can_reset_password(" DONE@example.com").await.is_ok());
    assert_eq!(
        auth.can_reset_password("done@example.com").await.unwrap_err(),
        ErrorCode::UserConfirmationEmailSentTooOften
    );
}

#[tokio::test]
async fn test_full_account_lifecycle() {
    let app = TestApp::new();
    let auth = &app.services.auth;
    let confirmation = &app.services.confirmation;

    let id = app.register("life@example.com", "password1").await;

    let user = auth.can_request_confirmation_code("life@example.com", "password1").await.unwrap();
    confirmation
        .send_new_confirmation_code(user.id, ConfirmationCodeKind::AccountConfirm)
        .await
        .unwrap();
    let code = app.stored_code(id).await;

    let session = auth.login_by_confirmation_code(Some(&code)).await.unwrap();
    assert_eq!(session.user.id, id);
    assert!(auth.auth(&session.token).await.is_some());

    confirmation.confirm_user(&code).await.unwrap();
    assert!(app.user(id).await.confirmed);
    assert_eq!(
        auth.login_by_confirmation_code(Some(&code)).await.unwrap_err(),
        ErrorCode::UserNotFound
    );

    app.advance_seconds(61);
    let user = auth.can_reset_password("life@example.com").await.unwrap();
    confirmation
        .send_new_confirmation_code(user.id, ConfirmationCodeKind::ChangePassword)
        .await
        .unwrap();
    let reset_code = app.stored_code(id).await;

    let session = auth.change_password(Some(&reset_code), "password2").await.unwrap();
    assert!(session.user.confirmation_code.is_none());

    assert!(auth.login("life@example.com", "password2").await.is_ok());
    assert_eq!(
        auth.login("life@example.com", "password1").await.unwrap_err(),
        ErrorCode::InvalidPassword
    );
}

#[tokio::test(start_paused = true)]
async fn test_password_change_during_code_delivery_is_kept() {
    let app = TestApp::with_delivery(Arc::new(SlowDelivery));
    let id = app.create_confirmed_user("slow@example.com", "password1", &[]).await;
    app.services
        .users
        .set_confirmation_code(id, Some("reset".to_string()))
        .await
        .unwrap();

    let confirmation = app.services.confirmation.clone();
    let sender = tokio::spawn(async move {
        confirmation
            .send_new_confirmation_code(id, ConfirmationCodeKind::ChangePassword)
            .await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    app.services.auth.change_password(Some("reset"), "password2").await.unwrap();
    sender.await.unwrap().unwrap();

    assert!(app.services.auth.login("slow@example.com", "password2").await.is_ok());
    assert_eq!(
        app.services.auth.login("slow@example.com", "password1").await.unwrap_err(),
        ErrorCode::InvalidPassword
    );
    assert_ne!(app.stored_code(id).await, "reset");
}
