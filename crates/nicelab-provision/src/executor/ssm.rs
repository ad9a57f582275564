//! AWS Systems Manager executor (requires the `ssm` feature).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::config::{Credentials, Region};
use aws_sdk_ssm::error::DisplayErrorContext;
use tracing::{debug, info};

use nicelab_core::config::AwsConfig;
use nicelab_core::error::{AppError, ErrorKind};
use nicelab_core::result::AppResult;

use super::{CommandExecutor, CommandHandle, CommandRequest, InvocationStatus};

/// Runs command batches through `SendCommand` and observes them with
/// `GetCommandInvocation`.
#[derive(Debug, Clone)]
pub struct SsmCommandExecutor {
    client: Client,
}

impl SsmCommandExecutor {
    /// Build an SSM client from configuration.
    ///
    /// Static credentials are used only when both halves are configured.
    pub async fn from_config(config: &AwsConfig) -> Self {
        info!(
            region = %config.region,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "Initializing SSM command executor"
        );

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key,
                secret,
                None,
                None,
                "nicelab-config",
            ));
        }

        let sdk_config = loader.load().await;
        Self {
            client: Client::new(&sdk_config),
        }
    }

    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommandExecutor for SsmCommandExecutor {
    async fn send_command(&self, request: &CommandRequest) -> AppResult<CommandHandle> {
        let output = self
            .client
            .send_command()
            .document_name(&request.document_name)
            .instance_ids(&request.target)
            .parameters("commands", request.commands.clone())
            .send()
            .await
            .map_err(|e| {
                AppError::new(
                    ErrorKind::ExternalService,
                    format!("SendCommand failed: {}", DisplayErrorContext(&e)),
                )
            })?;

        let command_id = output
            .command()
            .and_then(|c| c.command_id())
            .ok_or_else(|| {
                AppError::new(ErrorKind::ExternalService, "SendCommand returned no command id")
            })?;

        Ok(CommandHandle {
            command_id: command_id.to_string(),
        })
    }

    async fn invocation_status(
        &self,
        handle: &CommandHandle,
        target: &str,
    ) -> AppResult<InvocationStatus> {
        let result = self
            .client
            .get_command_invocation()
            .command_id(&handle.command_id)
            .instance_id(target)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            // The invocation is registered asynchronously after SendCommand.
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_invocation_does_not_exist()) =>
            {
                debug!(command_id = %handle.command_id, "Invocation not registered yet");
                return Ok(InvocationStatus::running());
            }
            Err(e) => {
                return Err(AppError::new(
                    ErrorKind::ExternalService,
                    format!("GetCommandInvocation failed: {}", DisplayErrorContext(&e)),
                ));
            }
        };

        Ok(InvocationStatus {
            response_code: output.response_code(),
            stdout: output.standard_output_content().unwrap_or_default().to_string(),
            stderr: output.standard_error_content().unwrap_or_default().to_string(),
        })
    }
}
