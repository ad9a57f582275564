//! Remote-desktop connection details.

use serde::{Deserialize, Serialize};

/// What a client needs to open a remote-desktop connection to a reserved lab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredentials {
    pub hostname: String,
    pub username: String,
    pub password: String,
}
