// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Credential storage abstraction with flat-file and in-memory implementations.
//!
//! Consistency model: every operation re-reads the whole store and every
//! mutation rewrites it. Nothing is cached between calls, so several processes
//! pointed at the same file never drift apart on reads.
use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use metrics::counter;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tokio::{
    fs as tokio_fs,
    io::AsyncWriteExt,
    sync::{Mutex, OwnedMutexGuard},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::CredentialError;
use crate::metrics::STORE_CORRUPTION;

/// Held for the duration of a read-modify-write on the store.
pub type WriteGuard = OwnedMutexGuard<()>;

const USERNAME_FIELD: &str = "username";
const HASH_FIELD: &str = "password_hash";

/// A single stored account
///
/// Entries are read leniently so one damaged entry never hides the others:
/// a non-string `username` or `password_hash` stays in `extra`, and an entry
/// that is not an object at all is carried through untouched. Either way the
/// entry is written back exactly as it was read.
#[derive(Clone, PartialEq)]
pub struct UserRecord {
    /// Empty when the entry has no string username; such entries never match
    pub username: String,
    /// PHC string; `None` or empty marks a corrupted record
    pub password_hash: Option<String>,
    /// Remaining fields of the entry, kept as-is
    pub extra: Map<String, Value>,
    unrecognized: Option<Value>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: Some(password_hash.into()),
            extra: Map::new(),
            unrecognized: None,
        }
    }

    /// The stored hash, if the record has a usable one
    pub fn hash(&self) -> Option<&str> {
        self.password_hash.as_deref().filter(|h| !h.is_empty())
    }

    /// Whether the entry could serve as an account at all
    pub fn is_account(&self) -> bool {
        self.unrecognized.is_none() && !self.username.is_empty()
    }

    fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self {
                username: String::new(),
                password_hash: None,
                extra: Map::new(),
                unrecognized: Some(value),
            };
        };

        let username = match fields.remove(USERNAME_FIELD) {
            Some(Value::String(name)) => name,
            Some(other) => {
                fields.insert(USERNAME_FIELD.to_string(), other);
                String::new()
            },
            None => String::new(),
        };
        let password_hash = match fields.remove(HASH_FIELD) {
            Some(Value::String(hash)) => Some(hash),
            Some(other) => {
                fields.insert(HASH_FIELD.to_string(), other);
                None
            },
            None => None,
        };

        Self {
            username,
            password_hash,
            extra: fields,
            unrecognized: None,
        }
    }

    fn to_value(&self) -> Value {
        if let Some(value) = &self.unrecognized {
            return value.clone();
        }

        let mut fields = self.extra.clone();
        if !self.username.is_empty() {
            fields.insert(USERNAME_FIELD.to_string(), Value::String(self.username.clone()));
        }
        if let Some(hash) = &self.password_hash {
            fields.insert(HASH_FIELD.to_string(), Value::String(hash.clone()));
        }
        Value::Object(fields)
    }
}

impl Serialize for UserRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UserRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password_hash", &self.hash().map(|_| "<redacted>"))
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .field("unrecognized", &self.unrecognized.is_some())
            .finish()
    }
}

/// On-disk document: `{"users": [...]}`
#[derive(Deserialize, Default)]
struct UserDocument {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Serialize)]
struct UserDocumentRef<'a> {
    users: &'a [UserRecord],
}

/// Linear scan, exact case-sensitive match, first hit wins
pub fn find_by_username<'a>(records: &'a [UserRecord], username: &str) -> Option<&'a UserRecord> {
    records
        .iter()
        .find(|record| record.is_account() && record.username == username)
}

/// Trait for credential storage backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read every record. A missing store is created empty, a malformed one
    /// reads as empty.
    async fn load(&self) -> Result<Vec<UserRecord>, CredentialError>;

    /// Replace the whole store with `records`.
    async fn save(&self, records: &[UserRecord]) -> Result<(), CredentialError>;

    /// Acquire the store's write lock. Hold it across load → check → save.
    async fn lock(&self) -> WriteGuard;

    fn find_by_username<'a>(
        &self,
        records: &'a [UserRecord],
        username: &str,
    ) -> Option<&'a UserRecord> {
        find_by_username(records, username)
    }
}

fn parse_document(content: &[u8], origin: &dyn fmt::Debug) -> Vec<UserRecord> {
    // A store being created lazily is briefly zero-length
    if content.iter().all(u8::is_ascii_whitespace) {
        debug!(store = ?origin, "credential store is empty");
        return Vec::new();
    }
    match serde_json::from_slice::<UserDocument>(content) {
        Ok(doc) => doc.users,
        Err(err) => {
            warn!(store = ?origin, error = %err, "credential store is malformed, treating as empty");
            counter!(STORE_CORRUPTION).increment(1);
            Vec::new()
        },
    }
}

fn serialize_document(records: &[UserRecord]) -> Result<Vec<u8>, CredentialError> {
    serde_json::to_vec_pretty(&UserDocumentRef { users: records })
        .map_err(|e| CredentialError::Internal(format!("failed to serialize store: {e}")))
}

/// Flat-file implementation of the `CredentialStore` trait
///
/// Saves go to a uniquely named sibling file which is then renamed over the
/// target, so concurrent readers see either the old or the new document.
#[derive(Clone, Debug)]
pub struct FlatFileStorage {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        name.push(format!(".{}.tmp", Uuid::new_v4()));
        self.path.with_file_name(name)
    }

    /// Write an empty document unless the file appeared in the meantime.
    async fn create_empty(&self) -> Result<(), CredentialError> {
        let result = tokio_fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await;

        match result {
            Ok(mut file) => {
                file.write_all(&serialize_document(&[])?).await?;
                file.flush().await?;
                debug!(path = ?self.path, "created empty credential store");
                Ok(())
            },
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_temp(&self, tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio_fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FlatFileStorage {
    async fn load(&self) -> Result<Vec<UserRecord>, CredentialError> {
        let content = match tokio_fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.create_empty().await?;
                return Ok(Vec::new());
            },
            Err(err) => return Err(err.into()),
        };

        Ok(parse_document(&content, &self.path))
    }

    async fn save(&self, records: &[UserRecord]) -> Result<(), CredentialError> {
        let bytes = serialize_document(records)?;
        let tmp = self.temp_path();

        if let Err(err) = self.write_temp(&tmp, &bytes).await {
            let _ = tokio_fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        if let Err(err) = tokio_fs::rename(&tmp, &self.path).await {
            let _ = tokio_fs::remove_file(&tmp).await;
            return Err(err.into());
        }

        debug!(path = ?self.path, records = records.len(), "credential store saved");
        Ok(())
    }

    async fn lock(&self) -> WriteGuard {
        self.write_lock.clone().lock_owned().await
    }
}

/// In-memory implementation of the `CredentialStore` trait
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<Vec<UserRecord>>>,
    write_lock: Arc<Mutex<()>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<UserRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryStorage {
    async fn load(&self) -> Result<Vec<UserRecord>, CredentialError> {
        Ok(self.snapshot())
    }

    async fn save(&self, records: &[UserRecord]) -> Result<(), CredentialError> {
        *self.records.write() = records.to_vec();
        Ok(())
    }

    async fn lock(&self) -> WriteGuard {
        self.write_lock.clone().lock_owned().await
    }
}
