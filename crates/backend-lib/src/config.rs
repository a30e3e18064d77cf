// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Sources, later ones win: built-in defaults, a TOML file, `CREDVAULT_*`
//! environment variables (`__` separates nesting levels), then plain `HOST`
//! and `PORT` for the listen address.
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::CredentialHasher;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "credvault.toml";
/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "CREDVAULT_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub hashing: HashingSettings,
    pub logging: LoggingSettings,
}

/// Listen address of the HTTP boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Location of the credential store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path of the JSON user document
    pub path: PathBuf,
}

/// Password hashing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Scrypt,
    Argon2id,
}

/// Work factor of the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    /// Algorithm used for new hashes. Existing hashes of either kind verify.
    pub algorithm: HashAlgorithm,
    /// scrypt cost, N = 2^log_n
    pub scrypt_log_n: u8,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9099,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("users.json"),
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Scrypt,
            scrypt_log_n: 15,
            argon2_memory_kib: 19 * 1024,
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

impl HashingSettings {
    /// Cheap parameters for tests; never use in production
    pub fn insecure_fast() -> Self {
        Self {
            algorithm: HashAlgorithm::Scrypt,
            scrypt_log_n: 4,
            argon2_memory_kib: 8,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    /// Layered provider; exposed so callers can merge their own overrides
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&["HOST", "PORT"])
                    .map(|key| format!("server.{}", key.as_str().to_ascii_lowercase()).into()),
            )
    }

    /// Load settings from `credvault.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment(None))
    }

    /// Load settings from an explicit config file and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_figment(Self::figment(Some(path.as_ref())))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.storage.path.as_os_str().is_empty() {
            bail!("storage.path must not be empty");
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            bail!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS,
                self.logging.level
            );
        }
        CredentialHasher::from_settings(&self.hashing)?;
        Ok(())
    }
}
