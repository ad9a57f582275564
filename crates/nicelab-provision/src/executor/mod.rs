//! Remote-execution backend seam.
//!
//! A backend accepts a command document, an ordered list of commands, and
//! one execution target, and hands back a handle immediately. Completion is
//! observed by querying the invocation status with that handle.

pub mod noop;
#[cfg(feature = "ssm")]
pub mod ssm;

use async_trait::async_trait;

use nicelab_core::result::AppResult;

pub use noop::NoopCommandExecutor;
#[cfg(feature = "ssm")]
pub use ssm::SsmCommandExecutor;

/// A batch submission.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    /// Document that interprets the commands (e.g. `AWS-RunShellScript`).
    pub document_name: String,
    /// Commands executed in order.
    pub commands: Vec<String>,
    /// Execution-target identifier.
    pub target: String,
}

/// Handle returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle {
    pub command_id: String,
}

/// Snapshot of a submitted command on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationStatus {
    /// `-1` while running, `0` on success, anything else on failure.
    pub response_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationStatus {
    pub const RUNNING: i32 = -1;

    /// Status of an invocation that has not finished.
    pub fn running() -> Self {
        Self {
            response_code: Self::RUNNING,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.response_code == Self::RUNNING
    }
}

/// Submits command batches and reports on their progress.
#[async_trait]
pub trait CommandExecutor: Send + Sync + std::fmt::Debug + 'static {
    /// Submit `request`. An error means the batch never started.
    async fn send_command(&self, request: &CommandRequest) -> AppResult<CommandHandle>;

    /// Query the status of `handle` on `target`.
    async fn invocation_status(
        &self,
        handle: &CommandHandle,
        target: &str,
    ) -> AppResult<InvocationStatus>;
}
