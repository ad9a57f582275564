//! Lab listing and reservation.

use http::StatusCode;

use nicelab_entity::{LabPlatform, UserRole};

use crate::helpers::{Script, ScriptedExecutor, TestApp};

async fn student_app(executor: ScriptedExecutor) -> (TestApp, String) {
    let app = TestApp::with_executor(executor).await;
    app.create_user("Ada", "ada@example.edu", UserRole::Student)
        .await;
    app.create_lab(42, LabPlatform::Linux, true).await;
    let token = app.login("ada@example.edu").await;
    (app, token)
}

#[tokio::test]
async fn test_reserve_lab_end_to_end() {
    let (app, token) = student_app(ScriptedExecutor::succeeding()).await;

    let response = app.request("POST", "/labs/42", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert!(response.body["id"].as_i64().is_some());
    assert_eq!(response.body["lab"]["id"], 42);
    assert_eq!(response.body["user"]["email"], "ada@example.edu");
    assert_eq!(
        response.body["credentials"]["username"],
        "adaatexample-edu"
    );
    assert_eq!(
        response.body["credentials"]["hostname"],
        "lab42.nicelab.test"
    );

    assert_eq!(app.sessions.creates(), 1);
    assert_eq!(app.executor.dispatches(), 1);

    let request = app.executor.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.document_name, "AWS-RunShellScript");
    assert_eq!(request.target, "i-0000002a");
    assert!(request.commands[0].contains("adaatexample-edu"));
}

#[tokio::test]
async fn test_reserve_unknown_lab_is_not_found() {
    let (app, token) = student_app(ScriptedExecutor::succeeding()).await;

    let response = app.request("POST", "/labs/7", Some(&token)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.executor.dispatches(), 0);
    assert_eq!(app.sessions.creates(), 0);
}

#[tokio::test]
async fn test_reserve_unavailable_lab_conflicts() {
    let (app, token) = student_app(ScriptedExecutor::succeeding()).await;
    app.create_lab(43, LabPlatform::Windows, false).await;

    let response = app.request("POST", "/labs/43", Some(&token)).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.executor.dispatches(), 0);
}

#[tokio::test]
async fn test_reserve_requires_token() {
    let (app, _token) = student_app(ScriptedExecutor::succeeding()).await;

    let response = app.request("POST", "/labs/42", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.executor.dispatches(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_agent_times_out_without_session() {
    let (app, token) = student_app(ScriptedExecutor::new(Script::Hang)).await;

    let response = app.request("POST", "/labs/42", Some(&token)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "PROVISION_TIMEOUT");
    assert_eq!(app.sessions.creates(), 0);
}

#[tokio::test]
async fn test_rejected_dispatch_is_distinct_from_timeout() {
    let (app, token) = student_app(ScriptedExecutor::new(Script::Reject)).await;

    let response = app.request("POST", "/labs/42", Some(&token)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "DISPATCH_FAILED");
    assert_eq!(app.executor.dispatches(), 1);
    assert_eq!(app.sessions.creates(), 0);
}

#[tokio::test]
async fn test_soft_failure_is_not_recorded() {
    let executor = ScriptedExecutor::new(Script::Complete {
        response_code: 1,
        stdout: "adduser: The user already exists.".to_string(),
    });
    let (app, token) = student_app(executor).await;

    let response = app.request("POST", "/labs/42", Some(&token)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "PROVISION_FAILED");
    assert_eq!(app.sessions.creates(), 0);
}

#[tokio::test]
async fn test_server_errors_do_not_leak_details() {
    let (app, token) = student_app(ScriptedExecutor::new(Script::Reject)).await;

    let response = app.request("POST", "/labs/42", Some(&token)).await;

    let message = response.body["message"].as_str().unwrap();
    assert!(!message.contains("InvalidInstanceId"));
}
