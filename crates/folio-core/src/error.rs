//! Unified error types for all layers of the application.

use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Unified error type for all layers of Folio.
///
/// Not-found lookups are modelled as `Ok(None)` at the repository and
/// cache layers; [`FolioError::NotFound`] only appears once a service
/// decides that absence is a failure for its caller.
#[derive(Error, Debug)]
pub enum FolioError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Authentication Errors ============
    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// Token was revoked before its natural expiry
    #[error("Token revoked")]
    TokenRevoked,

    // ============ Infrastructure Errors ============
    /// Document store error
    #[error("Database error: {0}")]
    Database(String),

    /// Blob store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error produced by a fetch shared between several concurrent callers.
    ///
    /// Every waiter receives a handle to the same underlying error.
    #[error(transparent)]
    Coalesced(Arc<FolioError>),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FolioError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_)
            | Self::InvalidToken(_)
            | Self::TokenExpired
            | Self::TokenRevoked => 401,
            Self::Storage(_) => 502,
            Self::Coalesced(inner) => inner.status_code(),
            Self::Database(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Coalesced(inner) => inner.error_code(),
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the original error behind any layers of coalescing.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Coalesced(inner) => inner.root(),
            other => other,
        }
    }

    /// Checks if this error is a not-found outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.root(),
            Self::Database(_) | Self::Storage(_) | Self::Cache(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for FolioError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                // MySQL duplicate key
                if db_err.code().is_some_and(|code| code == "1062" || code == "23000") {
                    return Self::Conflict(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(FolioError::not_found("Photo", "p1").status_code(), 404);
        assert_eq!(FolioError::validation("empty title").status_code(), 400);
        assert_eq!(FolioError::unauthorized("no token").status_code(), 401);
        assert_eq!(FolioError::TokenRevoked.status_code(), 401);
        assert_eq!(FolioError::Database("down".to_string()).status_code(), 500);
        assert_eq!(FolioError::Storage("blob".to_string()).status_code(), 502);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FolioError::not_found("Article", "Rust").error_code(), "NOT_FOUND");
        assert_eq!(FolioError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(FolioError::TokenRevoked.error_code(), "TOKEN_REVOKED");
        assert_eq!(FolioError::Cache("x".to_string()).error_code(), "CACHE_ERROR");
        assert_eq!(FolioError::internal("x").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_coalesced_error_delegates_to_root() {
        let shared = Arc::new(FolioError::Database("connection reset".to_string()));
        let first = FolioError::Coalesced(Arc::clone(&shared));
        let second = FolioError::Coalesced(shared);

        assert_eq!(first.status_code(), 500);
        assert_eq!(first.error_code(), "DATABASE_ERROR");
        assert_eq!(first.to_string(), second.to_string());
        assert!(first.is_retriable());
        assert!(matches!(first.root(), FolioError::Database(_)));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(FolioError::not_found("Photo", "p1").is_not_found());
        let wrapped = FolioError::Coalesced(Arc::new(FolioError::not_found("Photo", "p1")));
        assert!(wrapped.is_not_found());
        assert!(!FolioError::Database("x".to_string()).is_not_found());
    }

    #[test]
    fn test_non_retriable_errors() {
        assert!(!FolioError::validation("bad input").is_retriable());
        assert!(!FolioError::TokenExpired.is_retriable());
        assert!(!FolioError::not_found("Photo", 1).is_retriable());
    }
}
