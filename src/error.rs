//! Error type shared by every layer of the crate.
//!
//! Internal operations return `Result<_, AppError>`. The public facade never
//! lets an [`AppError`] escape from generation or resolution: it is folded into
//! the result value as an [`ErrorInfo`].

use serde::Serialize;
use serde_json::{Value, json};

/// Serializable description of a failure, embedded in result objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    Configuration { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    PatternMalformed { message: String, details: Value },
    #[error("{message}")]
    RetryExhausted { message: String, details: Value },
    /// A backing service could not answer. Callers decide whether to degrade.
    #[error("{message}")]
    Unavailable { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn configuration(message: impl Into<String>, details: Value) -> Self {
        Self::Configuration {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn pattern_malformed(message: impl Into<String>, details: Value) -> Self {
        Self::PatternMalformed {
            message: message.into(),
            details,
        }
    }
    pub fn retry_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::RetryExhausted {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::Configuration { .. } => "configuration_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::PatternMalformed { .. } => "pattern_malformed",
            AppError::RetryExhausted { .. } => "retry_exhausted",
            AppError::Unavailable { .. } => "unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            AppError::Validation { details, .. }
            | AppError::Configuration { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::PatternMalformed { details, .. }
            | AppError::RetryExhausted { details, .. }
            | AppError::Unavailable { details, .. }
            | AppError::Internal { details, .. } => details,
        }
    }

    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}

impl From<AppError> for ErrorInfo {
    fn from(error: AppError) -> Self {
        error.to_info()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Invalid generation options",
            json!({ "errors": errors.to_string() }),
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::unavailable("Redis error", json!({ "reason": e.to_string() }))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::internal("Serialization error", json!({ "reason": e.to_string() }))
    }
}

/// Translates a database error, keeping unique violations distinguishable.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
            AppError::unavailable("Database unavailable", json!({ "reason": e.to_string() }))
        }
        other => AppError::internal("Database error", json!({ "reason": other.to_string() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).code(),
            "validation_error"
        );
        assert_eq!(
            AppError::retry_exhausted("x", json!({})).code(),
            "retry_exhausted"
        );
        assert_eq!(
            AppError::pattern_malformed("x", json!({})).code(),
            "pattern_malformed"
        );
    }

    #[test]
    fn test_to_info_keeps_message_and_details() {
        let err = AppError::conflict("Slug already taken", json!({ "slug": "abc" }));
        let info = err.to_info();

        assert_eq!(info.code, "conflict");
        assert_eq!(info.message, "Slug already taken");
        assert_eq!(info.details["slug"], "abc");
    }
}
