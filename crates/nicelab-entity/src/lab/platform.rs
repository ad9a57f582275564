//! Lab platform enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system family of a lab machine.
///
/// Selects the command document and batch used to provision accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lab_platform", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LabPlatform {
    /// Linux desktop images (Kali and friends).
    Linux,
    /// Windows desktop images.
    Windows,
}

impl LabPlatform {
    /// Return the platform as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for LabPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LabPlatform {
    type Err = nicelab_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" | "kali" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            _ => Err(nicelab_core::AppError::validation(format!(
                "Invalid lab platform: '{s}'. Expected one of: linux, windows"
            ))),
        }
    }
}
