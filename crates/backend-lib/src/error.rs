// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use credvault_common::{ErrorDetail, ErrorResponse};
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors produced by the credential core.
///
/// Variants never carry plaintext passwords or password hashes.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Username already exists")]
    DuplicateUser,

    /// Unknown username and wrong password share this variant.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl CredentialError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CredentialError::Validation(_) | CredentialError::DuplicateUser => {
                StatusCode::BAD_REQUEST
            },
            CredentialError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            CredentialError::Internal(_) | CredentialError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CredentialError::Validation(_) => "VAL_001",
            CredentialError::DuplicateUser => "USER_001",
            CredentialError::InvalidCredentials => "AUTH_001",
            CredentialError::Internal(_) => "INT_001",
            CredentialError::Storage(_) => "STORE_001",
        }
    }

    /// Message suitable for the caller; internal details stay server-side
    pub fn public_message(&self) -> String {
        match self {
            CredentialError::Validation(err) => err.to_string(),
            CredentialError::DuplicateUser => "Username already exists".to_string(),
            CredentialError::InvalidCredentials => "Invalid username or password".to_string(),
            CredentialError::Internal(_) => "User data invalid".to_string(),
            CredentialError::Storage(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for CredentialError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.public_message(),
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for CredentialError {
    fn from(err: tokio::task::JoinError) -> Self {
        CredentialError::Internal(format!("hashing task failed: {err}"))
    }
}
