//! Convenience result type alias for NiceLab.

use crate::error::AppError;

/// A specialized `Result` type for NiceLab operations.
pub type AppResult<T> = Result<T, AppError>;
