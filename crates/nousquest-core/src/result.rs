//! Convenience result type alias for NousQuest.

use crate::error::AppError;

/// A specialized `Result` type for NousQuest operations.
pub type AppResult<T> = Result<T, AppError>;
