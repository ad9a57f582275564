//! Provisioning failures.

use std::time::Duration;

use thiserror::Error;

use nicelab_core::error::{AppError, ErrorKind};

/// Why a provisioning attempt produced no outcome.
///
/// A remote script that ran and exited non-zero is not an error; it is a
/// [`ProvisioningOutcome`](crate::ProvisioningOutcome) with
/// `succeeded == false`.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The backend rejected the submission. Nothing ran.
    #[error("command dispatch to {instance_id} failed")]
    DispatchFailed {
        instance_id: String,
        #[source]
        source: AppError,
    },

    /// The deadline elapsed before a terminal status was observed.
    #[error("provisioning did not finish within {budget:?}")]
    TimedOut { budget: Duration },

    /// Querying the invocation status failed.
    #[error("status query for command {command_id} failed")]
    StatusQueryFailed {
        command_id: String,
        #[source]
        source: AppError,
    },
}

impl From<ProvisionError> for AppError {
    fn from(err: ProvisionError) -> Self {
        let kind = match &err {
            ProvisionError::DispatchFailed { .. } => ErrorKind::DispatchFailed,
            ProvisionError::TimedOut { .. } => ErrorKind::TimedOut,
            ProvisionError::StatusQueryFailed { .. } => ErrorKind::ExternalService,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}
