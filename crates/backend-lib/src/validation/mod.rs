// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for credential requests.
//!
//! Lengths are counted in characters, not bytes, so multi-byte usernames get
//! the same budget as ASCII ones.

use thiserror::Error;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Possible validation errors
///
/// Messages mention lengths only, never the rejected value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must be between 3 and 64 characters (got {0})")]
    UsernameLength(usize),

    #[error("Password must be between 6 and 256 characters (got {0})")]
    PasswordLength(usize),

    #[error("Request body must be a JSON object with string fields `username` and `password`")]
    MalformedRequest,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a username
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::UsernameLength(len));
    }
    Ok(username)
}

/// Validate a password
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(ValidationError::PasswordLength(len));
    }
    Ok(password)
}

/// Validate a username/password pair, username first
pub fn validate_credentials(username: &str, password: &str) -> ValidationResult<()> {
    validate_username(username)?;
    validate_password(password)?;
    Ok(())
}
