//! Session listing and credential lookup.

use http::StatusCode;

use nicelab_entity::{LabPlatform, UserRole};

use crate::helpers::TestApp;

struct Fixture {
    app: TestApp,
    owner: String,
    other: String,
    professor: String,
}

async fn fixture() -> Fixture {
    let app = TestApp::new().await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;
    app.create_user("Alan", "alan@example.edu", UserRole::Student)
        .await;
    app.create_user("Grace", "grace@example.edu", UserRole::Professor)
        .await;
    app.create_lab(42, LabPlatform::Linux, true).await;
    app.create_lab(43, LabPlatform::Windows, true).await;

    let owner = app.login("ada@example.edu").await;
    let other = app.login("alan@example.edu").await;
    let professor = app.login("grace@example.edu").await;
    Fixture {
        app,
        owner,
        other,
        professor,
    }
}

async fn reserve(fx: &Fixture, lab: i64, token: &str) -> i64 {
    let response = fx
        .app
        .request("POST", &format!("/labs/{lab}"), Some(token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_owner_reads_own_credentials() {
    let fx = fixture().await;
    let id = reserve(&fx, 42, &fx.owner).await;

    let response = fx
        .app
        .request("GET", &format!("/sessions/{id}"), Some(&fx.owner))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "adaatexample-edu");
    assert_eq!(response.body["hostname"], "lab42.nicelab.test");
    assert!(!response.body["password"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_student_cannot_read_credentials() {
    let fx = fixture().await;
    let id = reserve(&fx, 42, &fx.owner).await;

    let response = fx
        .app
        .request("GET", &format!("/sessions/{id}"), Some(&fx.other))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_professor_reads_any_credentials() {
    let fx = fixture().await;
    let id = reserve(&fx, 43, &fx.owner).await;

    let response = fx
        .app
        .request("GET", &format!("/sessions/{id}"), Some(&fx.professor))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "adaatexample-edu");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let fx = fixture().await;

    let response = fx
        .app
        .request("GET", "/sessions/999", Some(&fx.professor))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_sessions_is_professor_only_and_newest_first() {
    let fx = fixture().await;
    let first = reserve(&fx, 42, &fx.owner).await;
    let second = reserve(&fx, 43, &fx.other).await;

    let denied = fx.app.request("GET", "/sessions", Some(&fx.owner)).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);

    let listed = fx
        .app
        .request("GET", "/sessions", Some(&fx.professor))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let ids: Vec<i64> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_repeat_reservations_create_distinct_sessions() {
    let fx = fixture().await;
    let a = reserve(&fx, 42, &fx.owner).await;
    let b = reserve(&fx, 42, &fx.owner).await;

    assert_ne!(a, b);
    assert_eq!(fx.app.sessions.creates(), 2);
}
