// ============================
// crates/backend-lib/src/auth/service_impl.rs
// ============================
//! `AuthService` implementation over any `CredentialStore`.
use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, error, info, instrument, warn};
use zeroize::Zeroizing;

use super::{Account, AuthService, CredentialHasher};
use crate::config::HashingSettings;
use crate::error::CredentialError;
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS, SIGNUP_DUPLICATE, SIGNUP_REJECTED, SIGNUP_SUCCESS};
use crate::storage::{CredentialStore, UserRecord};
use crate::validation::validate_credentials;

/// Register/authenticate rules on top of a `CredentialStore`.
///
/// Every call reads the store afresh. Registration hashes outside the store
/// lock and repeats the duplicate check under it, so concurrent signups for
/// one name produce exactly one record.
pub struct CredentialService<S> {
    store: S,
    hasher: CredentialHasher,
}

impl<S: CredentialStore> CredentialService<S> {
    pub fn new(store: S, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    pub fn from_settings(store: S, settings: &HashingSettings) -> anyhow::Result<Self> {
        Ok(Self::new(store, CredentialHasher::from_settings(settings)?))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn ensure_available(&self, username: &str) -> Result<(), CredentialError> {
        let records = self.store.load().await?;
        if self.store.find_by_username(&records, username).is_some() {
            counter!(SIGNUP_DUPLICATE).increment(1);
            debug!("username already taken");
            return Err(CredentialError::DuplicateUser);
        }
        Ok(())
    }
}

#[async_trait]
impl<S: CredentialStore> AuthService for CredentialService<S> {
    #[instrument(skip_all, fields(username = %username))]
    async fn register(&self, username: &str, password: &str) -> Result<Account, CredentialError> {
        if let Err(err) = validate_credentials(username, password) {
            counter!(SIGNUP_REJECTED).increment(1);
            debug!(error = %err, "signup rejected by validation");
            return Err(err.into());
        }

        // Refuse known names before paying for a hash
        self.ensure_available(username).await?;

        let password_hash = self.hasher.hash(Zeroizing::new(password.to_owned())).await?;

        let _guard = self.store.lock().await;
        let mut records = self.store.load().await?;
        if self.store.find_by_username(&records, username).is_some() {
            counter!(SIGNUP_DUPLICATE).increment(1);
            debug!("username taken by a concurrent signup");
            return Err(CredentialError::DuplicateUser);
        }
        records.push(UserRecord::new(username, password_hash));
        self.store.save(&records).await?;

        counter!(SIGNUP_SUCCESS).increment(1);
        info!(accounts = records.len(), "account registered");
        Ok(Account {
            username: username.to_owned(),
        })
    }

    #[instrument(skip_all, fields(username = %username))]
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, CredentialError> {
        let plain = Zeroizing::new(password.to_owned());
        let records = self.store.load().await?;

        let Some(record) = self.store.find_by_username(&records, username) else {
            // TODO: storage I/O still differs between the two paths; pad
            // the response to a fixed floor if enumeration becomes a concern.
            if let Err(err) = self.hasher.verify_dummy(plain).await {
                warn!(error = %err, "dummy verification failed");
            }
            counter!(LOGIN_FAILURE).increment(1);
            debug!("login for unknown username");
            return Err(CredentialError::InvalidCredentials);
        };

        let Some(hash) = record.hash() else {
            error!("stored record has no password hash");
            return Err(CredentialError::Internal(
                "stored record has no password hash".to_string(),
            ));
        };

        if !self.hasher.verify(hash.to_owned(), plain).await? {
            counter!(LOGIN_FAILURE).increment(1);
            debug!("wrong password");
            return Err(CredentialError::InvalidCredentials);
        }

        counter!(LOGIN_SUCCESS).increment(1);
        info!("login succeeded");
        Ok(Account {
            username: username.to_owned(),
        })
    }
}
