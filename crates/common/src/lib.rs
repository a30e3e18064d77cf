// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between credvault clients and the server.
//! This module defines the JSON bodies of the signup and login endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for `POST /api/signup` and `POST /api/login`
/// # Fields
/// * `username` - Account name (3-64 characters, case-sensitive)
/// * `password` - Plaintext password (6-256 characters)
#[derive(Serialize, Deserialize, Clone)]
pub struct AuthPayload {
    pub username: String,
    pub password: String,
}

impl AuthPayload {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// The password must never end up in a log line.
impl fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPayload")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful signup/login response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    /// Human readable outcome, e.g. "Signup success"
    pub msg: String,
    /// The account the operation applied to
    pub username: String,
}

impl AuthResponse {
    pub fn signup(username: impl Into<String>) -> Self {
        Self {
            msg: "Signup success".to_string(),
            username: username.into(),
        }
    }

    pub fn login(username: impl Into<String>) -> Self {
        Self {
            msg: "Login success".to_string(),
            username: username.into(),
        }
    }
}

/// Error envelope returned for every non-2xx response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Machine-readable code plus a generic, caller-safe message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Stable error code, e.g. `AUTH_001`
    pub code: String,
    /// Message safe to show to end users
    pub message: String,
}
