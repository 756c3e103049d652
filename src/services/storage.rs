//! Submission-hash persistence
//!
//! The list of forms a volunteer already sent lives under one key of a small
//! key-value store, JSON-encoded. Updates are read-modify-append-write and not
//! transactional; a single writer is assumed.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::{debug, info};
use crate::config::settings::{StorageBackend, StorageConfig};
use crate::models::event::Event;
use crate::utils::errors::{Result, VolunteerError};
use crate::utils::logging::log_persistence_error;

/// Minimal string key-value store
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store, used in tests and when persistence is disabled
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Single JSON object on disk, one string value per key
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SubmissionStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = match self.read_all().await {
            Ok(entries) => entries,
            Err(VolunteerError::Serialization(e)) => {
                log_persistence_error("read", &format!("{}: {}", self.path.display(), e));
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(&entries)?).await?;
        debug!(path = %self.path.display(), key = key, "Store file written");
        Ok(())
    }
}

/// Redis-backed store
#[derive(Clone)]
pub struct RedisStore {
    connection_manager: redis::aio::ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self { connection_manager })
    }
}

#[async_trait]
impl SubmissionStore for RedisStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection_manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }
}

/// Build the configured store
pub async fn store_from_config(config: &StorageConfig) -> Result<Arc<dyn SubmissionStore>> {
    let store: Arc<dyn SubmissionStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&config.path)),
        StorageBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
    };
    info!(backend = ?config.backend, key = %config.key, "Submission store ready");
    Ok(store)
}

/// Advisory record of which events a volunteer already signed up for
#[derive(Clone)]
pub struct SubmissionLedger {
    store: Arc<dyn SubmissionStore>,
    key: String,
}

impl SubmissionLedger {
    pub fn new(store: Arc<dyn SubmissionStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        Ok(Self::new(store_from_config(config).await?, config.key.clone()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persisted hashes, in append order
    pub async fn load_hashes(&self) -> Result<Vec<String>> {
        match self.store.load(&self.key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                VolunteerError::Storage(format!("Corrupt submission list under '{}': {}", self.key, e))
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Append a hash. An unreadable list is treated as empty.
    pub async fn record(&self, hash: &str) -> Result<()> {
        let mut hashes = match self.load_hashes().await {
            Ok(hashes) => hashes,
            Err(e) => {
                log_persistence_error("read", &e.to_string());
                Vec::new()
            }
        };
        hashes.push(hash.to_string());

        let encoded = serde_json::to_string(&hashes)?;
        self.store.save(&self.key, &encoded).await?;
        debug!(hash = hash, total = hashes.len(), "Submission recorded");
        Ok(())
    }

    /// Hash set for lookups; read failures yield an empty set
    pub async fn submitted_set(&self) -> HashSet<String> {
        match self.load_hashes().await {
            Ok(hashes) => hashes.into_iter().collect(),
            Err(e) => {
                log_persistence_error("read", &e.to_string());
                HashSet::new()
            }
        }
    }

    pub async fn is_submitted(&self, event: &Event) -> bool {
        self.submitted_set().await.contains(&event.submission_hash())
    }

    /// Set `is_submitted` on every event from the persisted list
    pub async fn mark_submitted(&self, events: &mut [Event]) {
        let submitted = self.submitted_set().await;
        let mut marked = 0usize;
        for event in events.iter_mut() {
            event.is_submitted = submitted.contains(&event.submission_hash());
            if event.is_submitted {
                marked += 1;
            }
        }
        debug!(events = events.len(), marked = marked, "Submitted flags derived");
    }
}
