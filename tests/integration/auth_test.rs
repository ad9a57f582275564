//! Login, token resolution, and role checks.

use http::StatusCode;

use nicelab_entity::{LabPlatform, UserRole};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;

    let response = app
        .login_with("ada@example.edu", crate::helpers::PASSWORD)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["email"], "ada@example.edu");
    assert_eq!(response.body["user"]["role"], "student");
    assert!(!response.body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;

    let response = app.login_with("ada@example.edu", "wrong").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::new().await;

    let response = app.login_with("nobody@example.edu", "whatever").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_form_missing_field() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;

    let no_password = app
        .post_login_form("email=ada%40example.edu".to_string())
        .await;
    assert_eq!(no_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_password.body["error"], "UNAUTHENTICATED");

    let empty = app.post_login_form(String::new()).await;
    assert_eq!(empty.status, StatusCode::UNAUTHORIZED);
    assert_eq!(empty.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_missing_or_unknown_token_is_rejected() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/labs", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "UNAUTHENTICATED");

    let unknown = app.request("GET", "/labs", Some("not-a-token")).await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_resolves_to_its_owner() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;
    app.create_lab(42, LabPlatform::Linux, true).await;
    let token = app.login("ada@example.edu").await;

    let response = app.request("GET", "/labs", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_relogin_invalidates_previous_token() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;

    let first = app.login("ada@example.edu").await;
    assert_eq!(
        app.request("GET", "/labs", Some(&first)).await.status,
        StatusCode::OK
    );

    let second = app.login("ada@example.edu").await;
    assert_ne!(first, second);

    assert_eq!(
        app.request("GET", "/labs", Some(&first)).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.request("GET", "/labs", Some(&second)).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;
    let token = app.login("ada@example.edu").await;

    app.backend.expire_token(&token).await;

    let response = app.request("GET", "/labs", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_requires_professor() {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;
    app.create_user("Grace", "grace@example.edu", UserRole::Professor)
        .await;

    let student = app.login("ada@example.edu").await;
    let denied = app.request("GET", "/users", Some(&student)).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied.body["error"], "UNAUTHORIZED");

    let professor = app.login("grace@example.edu").await;
    let allowed = app.request("GET", "/users", Some(&professor)).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}
