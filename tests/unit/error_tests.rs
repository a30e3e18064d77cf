// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::http::StatusCode;
use credvault_backend_lib::{error::CredentialError, validation::ValidationError};
use std::io::{Error as IoError, ErrorKind};

#[test]
fn test_credential_error_status_codes() {
    assert_eq!(
        CredentialError::Validation(ValidationError::UsernameLength(1)).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        CredentialError::DuplicateUser.status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        CredentialError::InvalidCredentials.status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        CredentialError::Internal("missing hash".to_string()).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        CredentialError::Storage(IoError::new(ErrorKind::PermissionDenied, "denied")).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_credential_error_codes() {
    assert_eq!(
        CredentialError::Validation(ValidationError::MalformedRequest).error_code(),
        "VAL_001"
    );
    assert_eq!(CredentialError::DuplicateUser.error_code(), "USER_001");
    assert_eq!(CredentialError::InvalidCredentials.error_code(), "AUTH_001");
    assert_eq!(
        CredentialError::Internal("x".to_string()).error_code(),
        "INT_001"
    );
    assert_eq!(
        CredentialError::Storage(IoError::new(ErrorKind::Other, "x")).error_code(),
        "STORE_001"
    );
}

#[test]
fn test_public_messages() {
    assert_eq!(
        CredentialError::DuplicateUser.public_message(),
        "Username already exists"
    );
    assert_eq!(
        CredentialError::InvalidCredentials.public_message(),
        "Invalid username or password"
    );
    assert_eq!(
        CredentialError::Internal("record for bob has no hash".to_string()).public_message(),
        "User data invalid"
    );
}

#[test]
fn test_internal_details_stay_private() {
    let storage = CredentialError::Storage(IoError::new(
        ErrorKind::PermissionDenied,
        "/srv/secret/users.json",
    ));
    assert!(!storage.public_message().contains("/srv/secret"));

    let internal = CredentialError::Internal("stored hash is unreadable: $scrypt$...".to_string());
    assert!(!internal.public_message().contains("scrypt"));
}

#[test]
fn test_validation_error_conversion() {
    let err: CredentialError = ValidationError::PasswordLength(3).into();
    assert!(matches!(
        err,
        CredentialError::Validation(ValidationError::PasswordLength(3))
    ));
    assert!(err.public_message().contains("between 6 and 256"));
}
