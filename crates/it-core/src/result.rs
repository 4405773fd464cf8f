//! Result type aliases

use crate::error::ItError;

/// Standard Result type for issuetrack operations
pub type ItResult<T> = Result<T, ItError>;
