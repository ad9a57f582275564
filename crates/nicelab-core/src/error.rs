//! Error type shared by every NiceLab crate.
//!
//! Library code returns [`AppError`]; the HTTP layer decides how each
//! [`ErrorKind`] is presented.

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    NotFound,
    /// Token missing, unknown, or expired; or bad login credentials.
    Authentication,
    /// Known identity, wrong role or not the owner.
    Authorization,
    Validation,
    /// The target exists but cannot accept the operation right now.
    Conflict,
    Internal,
    Database,
    Configuration,
    Serialization,
    /// The remote-execution backend refused the batch; nothing ran.
    DispatchFailed,
    /// The batch was accepted but did not finish before the deadline.
    TimedOut,
    /// The batch finished with a non-zero exit code.
    ProvisioningFailed,
    /// A call to another service failed.
    ExternalService,
}

impl ErrorKind {
    /// Stable upper-case code used in logs.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::DispatchFailed => "DISPATCH_FAILED",
            Self::TimedOut => "TIMED_OUT",
            Self::ProvisioningFailed => "PROVISIONING_FAILED",
            Self::ExternalService => "EXTERNAL_SERVICE",
        }
    }

    /// Whether the caller caused this, as opposed to the server or a
    /// downstream system.
    pub const fn is_client_fault(self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::Authentication
                | Self::Authorization
                | Self::Validation
                | Self::Conflict
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An error with a kind, a message for humans, and an optional cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

macro_rules! kind_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shorthand for an [`ErrorKind::", stringify!($kind), "`] error.")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Like [`AppError::new`], keeping `source` as the cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    kind_constructors! {
        not_found => NotFound,
        authentication => Authentication,
        authorization => Authorization,
        validation => Validation,
        conflict => Conflict,
        internal => Internal,
        database => Database,
        configuration => Configuration,
        provisioning_failed => ProvisioningFailed,
        external_service => ExternalService,
    }

    /// Whether this error originates on the server side rather than from the caller.
    pub fn is_server_error(&self) -> bool {
        !self.kind.is_client_fault()
    }
}

// The boxed cause is not cloneable; clones keep kind and message only.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("Invalid JSON: {err}");
        Self::with_source(ErrorKind::Serialization, message, err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let message = format!("I/O failure: {err}");
        Self::with_source(ErrorKind::Internal, message, err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        let message = format!("Bad configuration: {err}");
        Self::with_source(ErrorKind::Configuration, message, err)
    }
}
