//! Convenience result type alias for AgriRent.

use crate::error::AppError;

/// A specialized `Result` type for AgriRent operations.
pub type AppResult<T> = Result<T, AppError>;
