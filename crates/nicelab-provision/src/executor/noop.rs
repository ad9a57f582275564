//! Executor that reports success without contacting any machine.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use nicelab_core::result::AppResult;

use super::{CommandExecutor, CommandHandle, CommandRequest, InvocationStatus};

/// Local-development executor: every command "completes" on first poll.
#[derive(Debug, Default)]
pub struct NoopCommandExecutor {
    sent: AtomicU64,
}

impl NoopCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommandExecutor for NoopCommandExecutor {
    async fn send_command(&self, request: &CommandRequest) -> AppResult<CommandHandle> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            target_id = %request.target,
            commands = request.commands.len(),
            "Skipping remote execution"
        );
        Ok(CommandHandle {
            command_id: format!("noop-{n}"),
        })
    }

    async fn invocation_status(
        &self,
        _handle: &CommandHandle,
        _target: &str,
    ) -> AppResult<InvocationStatus> {
        Ok(InvocationStatus {
            response_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
