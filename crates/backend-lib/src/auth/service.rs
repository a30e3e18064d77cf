// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the only way callers reach
//! stored credentials.
use async_trait::async_trait;
use serde::Serialize;

use crate::error::CredentialError;

/// Outcome of a successful register or authenticate call.
///
/// Deliberately carries nothing derived from the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub username: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account. Fails with `DuplicateUser` if the name is taken.
    async fn register(&self, username: &str, password: &str) -> Result<Account, CredentialError>;

    /// Check a password. Unknown users and wrong passwords both fail with
    /// `InvalidCredentials`.
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<Account, CredentialError>;
}
