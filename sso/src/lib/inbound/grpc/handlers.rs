use thiserror::Error;
use tonic::Status;

use crate::domain::auth::errors::AuthError;

pub mod is_admin;
pub mod login;
pub mod register;

/// Request fields rejected before the core is called.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email is empty")]
    EmptyEmail,

    #[error("password is empty")]
    EmptyPassword,

    #[error("app_id is required")]
    MissingAppId,

    #[error("user_id is required")]
    MissingUserId,
}

impl From<ValidationError> for Status {
    fn from(err: ValidationError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}

/// Translate a core error into a status. Internal details stay in the logs.
pub(crate) fn to_status(err: AuthError, invalid_credentials_message: &str) -> Status {
    match err {
        AuthError::InvalidCredentials => Status::invalid_argument(invalid_credentials_message),
        AuthError::UserAlreadyExists(_) => Status::already_exists("user already exists"),
        AuthError::Internal { .. } => Status::internal("internal error"),
        AuthError::Canceled => Status::cancelled("request canceled"),
        AuthError::DeadlineExceeded => Status::deadline_exceeded("deadline exceeded"),
    }
}
