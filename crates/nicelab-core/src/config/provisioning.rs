//! Remote provisioning configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which remote-execution backend drives lab machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorBackend {
    /// AWS Systems Manager `SendCommand` / `GetCommandInvocation`.
    Ssm,
    /// Reports immediate success without contacting any machine.
    Noop,
}

/// Provisioning driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Remote-execution backend.
    #[serde(default = "default_backend")]
    pub backend: ExecutorBackend,
    /// Command document used for Linux machines.
    #[serde(default = "default_linux_document")]
    pub linux_document: String,
    /// Command document used for Windows machines.
    #[serde(default = "default_windows_document")]
    pub windows_document: String,
    /// Sleep between status polls in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Delay before the first status poll in milliseconds.
    #[serde(default = "default_initial_poll_delay")]
    pub initial_poll_delay_ms: u64,
    /// Wall-clock budget for one provisioning attempt in seconds.
    #[serde(default = "default_deadline")]
    pub deadline_seconds: u64,
    /// Password assigned to freshly created lab accounts.
    #[serde(default = "default_temporary_password")]
    pub temporary_password: String,
    /// Shared storage mount point on Linux machines.
    #[serde(default = "default_shared_root_linux")]
    pub shared_storage_root_linux: String,
    /// Shared storage drive on Windows machines.
    #[serde(default = "default_shared_root_windows")]
    pub shared_storage_root_windows: String,
    /// Record a session even when the remote script exits non-zero.
    #[serde(default)]
    pub record_soft_failures: bool,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            linux_document: default_linux_document(),
            windows_document: default_windows_document(),
            poll_interval_ms: default_poll_interval(),
            initial_poll_delay_ms: default_initial_poll_delay(),
            deadline_seconds: default_deadline(),
            temporary_password: default_temporary_password(),
            shared_storage_root_linux: default_shared_root_linux(),
            shared_storage_root_windows: default_shared_root_windows(),
            record_soft_failures: false,
        }
    }
}

impl ProvisioningConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn initial_poll_delay(&self) -> Duration {
        Duration::from_millis(self.initial_poll_delay_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_seconds)
    }
}

fn default_backend() -> ExecutorBackend {
    ExecutorBackend::Ssm
}

fn default_linux_document() -> String {
    "AWS-RunShellScript".to_string()
}

fn default_windows_document() -> String {
    "AWS-RunPowerShellScript".to_string()
}

fn default_poll_interval() -> u64 {
    100
}

fn default_initial_poll_delay() -> u64 {
    100
}

fn default_deadline() -> u64 {
    30
}

fn default_temporary_password() -> String {
    "FlSg5ZJisEecHhMvvBtBPwhjZhdfbnwYjaMR".to_string()
}

fn default_shared_root_linux() -> String {
    "/var/fsx".to_string()
}

fn default_shared_root_windows() -> String {
    "Z:".to_string()
}
