//! The provisioning state machine.
//!
//! One call moves through `Dispatching -> Polling -> {Succeeded, SoftFailed}`.
//! A single deadline covers both phases; when it fires the call returns
//! [`ProvisionError::TimedOut`] and the background poll task is aborted.
//! Commands already dispatched may still complete on the machine.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};

use nicelab_core::config::ProvisioningConfig;
use nicelab_core::result::AppResult;
use nicelab_entity::{Lab, User};

use crate::batch::{BatchParams, build_command_batch, document_for, storage_root_for};
use crate::error::ProvisionError;
use crate::executor::{CommandExecutor, CommandHandle, CommandRequest, InvocationStatus};
use crate::username::username_from_email;

/// Terminal result of a provisioning attempt that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningOutcome {
    /// Whether the remote script exited with status 0.
    pub succeeded: bool,
    /// Captured stdout on success, stderr otherwise.
    pub output: String,
    pub response_code: i32,
}

impl From<InvocationStatus> for ProvisioningOutcome {
    fn from(status: InvocationStatus) -> Self {
        if status.response_code == 0 {
            Self {
                succeeded: true,
                output: status.stdout,
                response_code: 0,
            }
        } else {
            Self {
                succeeded: false,
                output: status.stderr,
                response_code: status.response_code,
            }
        }
    }
}

/// Creates per-user accounts on lab machines.
#[derive(Debug, Clone)]
pub struct Provisioner {
    executor: Arc<dyn CommandExecutor>,
    config: ProvisioningConfig,
}

impl Provisioner {
    pub fn new(executor: Arc<dyn CommandExecutor>, config: ProvisioningConfig) -> Self {
        Self { executor, config }
    }

    /// Password assigned to every provisioned account.
    pub fn temporary_password(&self) -> &str {
        &self.config.temporary_password
    }

    /// Default wall-clock budget for one attempt.
    pub fn default_deadline(&self) -> Duration {
        self.config.deadline()
    }

    /// Build the submission for `user` on `lab`.
    pub fn plan(&self, user: &User, lab: &Lab) -> CommandRequest {
        let username = username_from_email(&user.email);
        let params = BatchParams {
            username: &username,
            password: &self.config.temporary_password,
            storage_root: storage_root_for(lab.platform, &self.config),
        };

        CommandRequest {
            document_name: document_for(lab.platform, &self.config).to_string(),
            commands: build_command_batch(lab.platform, &params),
            target: lab.instance_id.clone(),
        }
    }

    /// Run the platform batch for `user` on `lab`, bounded by `budget`.
    ///
    /// Dispatch is attempted once. A non-zero exit is reported as an
    /// outcome with `succeeded == false`, not as an error.
    pub async fn provision(
        &self,
        user: &User,
        lab: &Lab,
        budget: Duration,
    ) -> Result<ProvisioningOutcome, ProvisionError> {
        let started = Instant::now();
        let deadline = started + budget;
        let request = self.plan(user, lab);

        info!(
            user_id = user.id,
            lab_id = lab.id,
            instance_id = %lab.instance_id,
            platform = %lab.platform,
            "Dispatching provisioning batch"
        );

        let handle = match tokio::time::timeout_at(deadline, self.executor.send_command(&request))
            .await
        {
            Ok(Ok(handle)) => handle,
            Ok(Err(source)) => {
                warn!(instance_id = %lab.instance_id, error = %source, "Dispatch failed");
                return Err(ProvisionError::DispatchFailed {
                    instance_id: lab.instance_id.clone(),
                    source,
                });
            }
            Err(_) => {
                warn!(instance_id = %lab.instance_id, "Deadline elapsed during dispatch");
                return Err(ProvisionError::TimedOut { budget });
            }
        };

        let mut poll = tokio::spawn(poll_until_complete(
            Arc::clone(&self.executor),
            handle.clone(),
            request.target,
            self.config.initial_poll_delay(),
            self.config.poll_interval(),
        ));

        tokio::select! {
            joined = &mut poll => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match joined {
                    Ok(Ok(status)) => {
                        let outcome = ProvisioningOutcome::from(status);
                        info!(
                            command_id = %handle.command_id,
                            response_code = outcome.response_code,
                            succeeded = outcome.succeeded,
                            elapsed_ms,
                            "Provisioning finished"
                        );
                        Ok(outcome)
                    }
                    Ok(Err(source)) => {
                        warn!(command_id = %handle.command_id, error = %source, "Status query failed");
                        Err(ProvisionError::StatusQueryFailed {
                            command_id: handle.command_id,
                            source,
                        })
                    }
                    Err(join_err) => Err(ProvisionError::StatusQueryFailed {
                        command_id: handle.command_id,
                        source: nicelab_core::AppError::internal(format!(
                            "Poll task ended abnormally: {join_err}"
                        )),
                    }),
                }
            }
            _ = tokio::time::sleep_until(deadline) => {
                poll.abort();
                warn!(
                    command_id = %handle.command_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Provisioning deadline elapsed"
                );
                Err(ProvisionError::TimedOut { budget })
            }
        }
    }
}

async fn poll_until_complete(
    executor: Arc<dyn CommandExecutor>,
    handle: CommandHandle,
    target: String,
    initial_delay: Duration,
    interval: Duration,
) -> AppResult<InvocationStatus> {
    if !initial_delay.is_zero() {
        tokio::time::sleep(initial_delay).await;
    }

    loop {
        let status = executor.invocation_status(&handle, &target).await?;
        if !status.is_running() {
            return Ok(status);
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use nicelab_core::AppError;
    use nicelab_entity::{LabPlatform, UserRole};

    /// Replays queued statuses; once exhausted, repeats the last one.
    #[derive(Debug, Default)]
    struct ScriptedExecutor {
        statuses: Mutex<VecDeque<InvocationStatus>>,
        reject_dispatch: bool,
        hang_dispatch: bool,
        requests: Mutex<Vec<CommandRequest>>,
        polls: AtomicUsize,
    }

    impl ScriptedExecutor {
        fn replying(statuses: Vec<InvocationStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                ..Default::default()
            }
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CommandExecutor for ScriptedExecutor {
        async fn send_command(&self, request: &CommandRequest) -> AppResult<CommandHandle> {
            if self.hang_dispatch {
                std::future::pending::<()>().await;
            }
            if self.reject_dispatch {
                return Err(AppError::external_service("InvalidInstanceId"));
            }
            self.requests.lock().unwrap().push(request.clone());
            Ok(CommandHandle {
                command_id: "cmd-1".into(),
            })
        }

        async fn invocation_status(
            &self,
            _handle: &CommandHandle,
            _target: &str,
        ) -> AppResult<InvocationStatus> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().cloned()
            };
            Ok(status.unwrap_or_else(InvocationStatus::running))
        }
    }

    fn status(code: i32, stdout: &str, stderr: &str) -> InvocationStatus {
        InvocationStatus {
            response_code: code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    fn user() -> User {
        User {
            id: 7,
            uuid: uuid::Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.edu".into(),
            role: UserRole::Student,
        }
    }

    fn lab(platform: LabPlatform) -> Lab {
        Lab {
            id: 42,
            uuid: uuid::Uuid::new_v4(),
            name: "lab-42".into(),
            platform,
            hostname: "lab-42.nicelab.local".into(),
            instance_id: "i-0123456789".into(),
            available: true,
        }
    }

    fn provisioner(executor: Arc<ScriptedExecutor>) -> Provisioner {
        Provisioner::new(executor, ProvisioningConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_poll() {
        let executor = Arc::new(ScriptedExecutor::replying(vec![status(0, "created", "")]));
        let outcome = provisioner(executor.clone())
            .provision(&user(), &lab(LabPlatform::Linux), Duration::from_secs(5))
            .await
            .unwrap();

        assert!(outcome.succeeded);
        assert_eq!(outcome.output, "created");
        assert_eq!(executor.polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nonzero_exit_is_soft_failure() {
        let executor = Arc::new(ScriptedExecutor::replying(vec![
            InvocationStatus::running(),
            status(7, "", "account exists"),
        ]));
        let outcome = provisioner(executor.clone())
            .provision(&user(), &lab(LabPlatform::Linux), Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!outcome.succeeded);
        assert_eq!(outcome.output, "account exists");
        assert_eq!(outcome.response_code, 7);
        assert_eq!(executor.polls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_finishing_command_times_out_and_stops_polling() {
        let executor = Arc::new(ScriptedExecutor::replying(vec![InvocationStatus::running()]));
        let config = ProvisioningConfig::default();
        let budget = Duration::from_secs(5);

        let started = Instant::now();
        let err = provisioner(executor.clone())
            .provision(&user(), &lab(LabPlatform::Windows), budget)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::TimedOut { .. }));
        assert!(started.elapsed() <= budget + config.poll_interval());

        let polls_at_timeout = executor.polls();
        assert!(polls_at_timeout > 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(executor.polls(), polls_at_timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_dispatch_times_out() {
        let executor = Arc::new(ScriptedExecutor {
            hang_dispatch: true,
            ..Default::default()
        });
        let err = provisioner(executor.clone())
            .provision(&user(), &lab(LabPlatform::Linux), Duration::from_secs(3))
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::TimedOut { .. }));
        assert_eq!(executor.polls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_dispatch_is_not_retried() {
        let executor = Arc::new(ScriptedExecutor {
            reject_dispatch: true,
            ..Default::default()
        });
        let err = provisioner(executor.clone())
            .provision(&user(), &lab(LabPlatform::Linux), Duration::from_secs(3))
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::DispatchFailed { .. }));
        assert_eq!(executor.polls(), 0);
    }

    #[test]
    fn test_plan_uses_platform_document_and_target() {
        let executor = Arc::new(ScriptedExecutor::default());
        let request = provisioner(executor).plan(&user(), &lab(LabPlatform::Windows));

        assert_eq!(request.document_name, "AWS-RunPowerShellScript");
        assert_eq!(request.target, "i-0123456789");
        assert!(request.commands[0].contains("adaatexample-edu"));
    }
}
