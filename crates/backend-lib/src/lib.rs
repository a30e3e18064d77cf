// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality for the credvault credential service.
//!
//! The core is `auth::CredentialService` over a `storage::CredentialStore`;
//! everything else wires it to HTTP.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, CredentialService};
use crate::config::Settings;
use crate::storage::{CredentialStore, FlatFileStorage};

pub use crate::error::CredentialError;
pub use crate::router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential service
    pub auth: Arc<dyn AuthService>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create application state over an explicit store
    pub fn new<S>(storage: S, config: &Settings) -> anyhow::Result<Self>
    where
        S: CredentialStore + 'static,
    {
        let service = CredentialService::from_settings(storage, &config.hashing)?;
        Ok(Self {
            auth: Arc::new(service),
            settings: Arc::new(config.clone()),
        })
    }

    /// Create application state over the flat file named in `config`
    pub fn from_settings(config: &Settings) -> anyhow::Result<Self> {
        let storage = FlatFileStorage::new(&config.storage.path)?;
        Self::new(storage, config)
    }
}
