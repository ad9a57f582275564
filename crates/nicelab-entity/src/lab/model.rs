//! Lab entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::platform::LabPlatform;

/// A lab virtual machine that can be reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Lab {
    /// Numeric primary key.
    pub id: i64,
    /// Globally unique external identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Operating system family.
    pub platform: LabPlatform,
    /// Network address handed to remote-desktop clients.
    pub hostname: String,
    /// Execution-target identifier understood by the remote-execution backend.
    pub instance_id: String,
    /// Whether the lab accepts new reservations.
    pub available: bool,
}
