//! Shared test helpers for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use nicelab_api::{AppState, ServiceScope, build_router};
use nicelab_auth::PasswordHasher;
use nicelab_core::AppError;
use nicelab_core::config::AppConfig;
use nicelab_core::result::AppResult;
use nicelab_database::{MemoryBackend, SessionStore, StoreSet};
use nicelab_entity::{Lab, LabPlatform, LabSession, User, UserRole};
use nicelab_provision::{CommandExecutor, CommandHandle, CommandRequest, InvocationStatus};

pub const PASSWORD: &str = "correct horse battery";

fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("hash test password")
    })
}

/// How the scripted executor answers.
#[derive(Debug, Clone)]
pub enum Script {
    /// Dispatch succeeds; the command finishes with this code after one
    /// running poll.
    Complete { response_code: i32, stdout: String },
    /// Dispatch succeeds; the command never finishes.
    Hang,
    /// Dispatch is rejected.
    Reject,
}

/// Remote-execution double that counts dispatches and polls.
#[derive(Debug)]
pub struct ScriptedExecutor {
    script: Script,
    pub dispatches: AtomicUsize,
    pub polls: AtomicUsize,
    pub last_request: std::sync::Mutex<Option<CommandRequest>>,
}

impl ScriptedExecutor {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            dispatches: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            last_request: std::sync::Mutex::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Script::Complete {
            response_code: 0,
            stdout: "session created".to_string(),
        })
    }

    pub fn dispatches(&self) -> usize {
        self.dispatches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn send_command(&self, request: &CommandRequest) -> AppResult<CommandHandle> {
        self.dispatches.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.script {
            Script::Reject => Err(AppError::external_service("InvalidInstanceId")),
            _ => Ok(CommandHandle {
                command_id: "cmd-1".to_string(),
            }),
        }
    }

    async fn invocation_status(
        &self,
        _handle: &CommandHandle,
        _target: &str,
    ) -> AppResult<InvocationStatus> {
        let polls = self.polls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Complete {
                response_code,
                stdout,
            } if polls > 0 => Ok(InvocationStatus {
                response_code: *response_code,
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            _ => Ok(InvocationStatus::running()),
        }
    }
}

/// Session store wrapper counting inserts.
#[derive(Debug)]
pub struct CountingSessionStore {
    inner: Arc<dyn SessionStore>,
    pub creates: AtomicUsize,
}

impl CountingSessionStore {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for CountingSessionStore {
    async fn create(&self, user_id: i64, lab_id: i64) -> AppResult<LabSession> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(user_id, lab_id).await
    }

    async fn list(&self) -> AppResult<Vec<LabSession>> {
        self.inner.list().await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<LabSession>> {
        self.inner.find_by_id(id).await
    }
}

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub backend: MemoryBackend,
    pub executor: Arc<ScriptedExecutor>,
    pub sessions: Arc<CountingSessionStore>,
}

/// Decoded test response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_executor(ScriptedExecutor::succeeding()).await
    }

    pub async fn with_executor(executor: ScriptedExecutor) -> Self {
        let mut config = AppConfig::default();
        config.provisioning.poll_interval_ms = 10;
        config.provisioning.initial_poll_delay_ms = 10;

        let backend = MemoryBackend::new();
        let mut stores = StoreSet::memory(backend.clone());
        let sessions = Arc::new(CountingSessionStore {
            inner: Arc::clone(&stores.sessions),
            creates: AtomicUsize::new(0),
        });
        stores.sessions = sessions.clone();

        let executor = Arc::new(executor);
        let state = AppState::build(config, stores, executor.clone());
        state.gate.warm().await.expect("warm token cache");

        Self {
            router: build_router(state, ServiceScope::All),
            backend,
            executor,
            sessions,
        }
    }

    pub async fn create_user(&self, name: &str, email: &str, role: UserRole) -> User {
        self.backend
            .insert_user(name, email, role, password_hash())
            .await
    }

    pub async fn create_lab(&self, id: i64, platform: LabPlatform, available: bool) -> Lab {
        self.backend
            .insert_lab(
                Some(id),
                &format!("lab-{id}"),
                platform,
                &format!("lab{id}.nicelab.test"),
                &format!("i-{id:08x}"),
                available,
            )
            .await
    }

    /// Log `email` in through the HTTP endpoint and return the token.
    pub async fn login(&self, email: &str) -> String {
        let response = self.login_with(email, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    pub async fn login_with(&self, email: &str, password: &str) -> TestResponse {
        let body = format!(
            "email={}&password={}",
            form_encode(email),
            form_encode(password)
        );
        self.post_login_form(body).await
    }

    /// POST /login with a raw form body.
    pub async fn post_login_form(&self, body: String) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Send a bodiless request, optionally with a session token.
    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("X-Session-Token", token);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        TestResponse { status, body }
    }
}

fn form_encode(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '@' => "%40".to_string(),
            ' ' => "+".to_string(),
            '&' => "%26".to_string(),
            c => c.to_string(),
        })
        .collect()
}
