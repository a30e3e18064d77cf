// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are PHC strings, so the algorithm and its cost travel with every
//! stored hash. Both scrypt and argon2id hashes verify regardless of which
//! algorithm is configured for new accounts.
use std::{sync::Arc, time::Instant};

use argon2::{Argon2, Algorithm as Argon2Algorithm, Version as Argon2Version};
use metrics::histogram;
use scrypt::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Scrypt,
};
use tokio::sync::OnceCell;
use zeroize::Zeroizing;

use crate::config::{HashAlgorithm, HashingSettings};
use crate::error::CredentialError;
use crate::metrics::HASH_DURATION;

const DUMMY_PASSWORD: &str = "credvault-timing-equalizer";

#[derive(Clone)]
enum Params {
    Scrypt(scrypt::Params),
    Argon2(argon2::Params),
}

struct HasherInner {
    params: Params,
    /// Hash burned on unknown usernames so they pay one verification too
    dummy_hash: OnceCell<String>,
}

/// Salted, slow password hashing with a configurable work factor
#[derive(Clone)]
pub struct CredentialHasher {
    inner: Arc<HasherInner>,
}

impl CredentialHasher {
    pub fn from_settings(settings: &HashingSettings) -> anyhow::Result<Self> {
        let params = match settings.algorithm {
            HashAlgorithm::Scrypt => Params::Scrypt(
                scrypt::Params::new(settings.scrypt_log_n, 8, 1, scrypt::Params::RECOMMENDED_LEN)
                    .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?,
            ),
            HashAlgorithm::Argon2id => Params::Argon2(
                argon2::Params::new(
                    settings.argon2_memory_kib,
                    settings.argon2_iterations,
                    settings.argon2_parallelism,
                    None,
                )
                .map_err(|e| anyhow::anyhow!("invalid argon2 parameters: {e}"))?,
            ),
        };

        Ok(Self {
            inner: Arc::new(HasherInner {
                params,
                dummy_hash: OnceCell::new(),
            }),
        })
    }

    /// Hash on the calling thread. Blocks for the full work factor.
    pub fn hash_blocking(&self, plain: &[u8]) -> Result<String, CredentialError> {
        let started = Instant::now();
        let salt = SaltString::generate(&mut OsRng);
        let hash = match &self.inner.params {
            Params::Scrypt(params) => Scrypt
                .hash_password_customized(plain, None, None, params.clone(), &salt)
                .map(|h| h.to_string()),
            Params::Argon2(params) => {
                Argon2::new(Argon2Algorithm::Argon2id, Argon2Version::V0x13, params.clone())
                    .hash_password(plain, &salt)
                    .map(|h| h.to_string())
            },
        }
        .map_err(|e| CredentialError::Internal(format!("password hashing failed: {e}")))?;

        histogram!(HASH_DURATION).record(started.elapsed().as_secs_f64());
        Ok(hash)
    }

    /// Check `plain` against a stored PHC string on the calling thread.
    ///
    /// `Ok(false)` means a wrong password; an unreadable hash is an error.
    pub fn verify_blocking(hash: &str, plain: &[u8]) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| CredentialError::Internal(format!("stored hash is unreadable: {e}")))?;

        let outcome = match parsed.algorithm.as_str() {
            "scrypt" => Scrypt.verify_password(plain, &parsed),
            "argon2id" | "argon2i" | "argon2d" => Argon2::default().verify_password(plain, &parsed),
            other => {
                return Err(CredentialError::Internal(format!(
                    "unsupported hash algorithm {other:?}"
                )))
            },
        };

        match outcome {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(CredentialError::Internal(format!(
                "password verification failed: {e}"
            ))),
        }
    }

    /// Hash on the blocking pool; the plaintext is wiped when the task ends
    pub async fn hash(&self, plain: Zeroizing<String>) -> Result<String, CredentialError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(plain.as_bytes())).await?
    }

    /// Verify on the blocking pool
    pub async fn verify(
        &self,
        hash: String,
        plain: Zeroizing<String>,
    ) -> Result<bool, CredentialError> {
        tokio::task::spawn_blocking(move || Self::verify_blocking(&hash, plain.as_bytes())).await?
    }

    /// Run one throwaway verification with the active parameters
    pub async fn verify_dummy(&self, plain: Zeroizing<String>) -> Result<(), CredentialError> {
        let dummy = self
            .inner
            .dummy_hash
            .get_or_try_init(|| self.hash(Zeroizing::new(DUMMY_PASSWORD.to_string())))
            .await?
            .clone();
        self.verify(dummy, plain).await?;
        Ok(())
    }
}
