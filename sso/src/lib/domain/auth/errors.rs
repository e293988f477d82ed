use thiserror::Error;

use crate::domain::auth::models::AppId;
use crate::domain::context::Interrupted;

/// Failures reported by the credential store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("User not found")]
    UserNotFound,

    #[error("App not found: {0}")]
    AppNotFound(AppId),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Top-level error for authentication operations.
///
/// Callers classify by variant. `Internal` keeps the failing operation and
/// cause for logs; transports must not forward them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("{op}: {message}")]
    Internal { op: &'static str, message: String },

    #[error("Operation canceled")]
    Canceled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl AuthError {
    pub(crate) fn internal(op: &'static str, cause: impl ToString) -> Self {
        AuthError::Internal {
            op,
            message: cause.to_string(),
        }
    }
}

impl From<Interrupted> for AuthError {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::Canceled => AuthError::Canceled,
            Interrupted::DeadlineExceeded => AuthError::DeadlineExceeded,
        }
    }
}
