//! Time-bounded cache of [`CatalogSnapshot`]s.
//!
//! A [`CatalogCache`] is a get-or-load store keyed by a string. [`CacheDriver`] implements it on
//! top of a storage [backend](SnapshotBackend): it applies the time-to-live when an entry is
//! written, keeps fresh entries in memory and coalesces concurrent misses so a single load runs
//! per key.
use std::{collections::HashMap, fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use iox_time::{Time, TimeProvider};
use observability_deps::tracing::{debug, warn};
use parking_lot::Mutex;

use crate::{CatalogSnapshot, UpstreamError};

mod backend;
mod file;

pub use backend::{CachedSnapshot, MemoryBackend, SnapshotBackend};
pub use file::FileBackend;

/// Errors of a [`SnapshotBackend`]
///
/// They never reach the callers of a [`CacheDriver`]: a failed read is a miss and a failed
/// write leaves the entry unpersisted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cache io error on {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode cache entry {path:?}: {source}")]
    Decode {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode cache entry: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Status of a [`CatalogCache`] get request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheGetStatus {
    /// A fresh entry was present in the storage backend.
    Hit,

    /// No fresh entry was present and no other load was running for this key.
    Miss,

    /// No fresh entry was present, but another load was already running for this key; this
    /// request waited for it.
    MissAlreadyLoading,
}

/// Produces a new snapshot on a cache miss
#[async_trait]
pub trait SnapshotLoader: Send + Sync {
    async fn load_snapshot(&self) -> Result<CatalogSnapshot, UpstreamError>;
}

/// Get-or-load store of catalog snapshots
#[async_trait]
pub trait CatalogCache: Debug + Send + Sync + 'static {
    /// Get the fresh entry for `key`, loading it with `loader` if absent or expired.
    ///
    /// A failed load is returned as is and does not touch the stored entry.
    async fn get_or_load(
        &self,
        key: &str,
        loader: &dyn SnapshotLoader,
    ) -> Result<Arc<CatalogSnapshot>, UpstreamError> {
        self.get_with_status(key, loader).await.map(|(s, _)| s)
    }

    /// Same as [`get_or_load`](Self::get_or_load), also reporting how the entry was obtained.
    async fn get_with_status(
        &self,
        key: &str,
        loader: &dyn SnapshotLoader,
    ) -> Result<(Arc<CatalogSnapshot>, CacheGetStatus), UpstreamError>;

    /// Side-load an entry into the cache, replacing any previous one.
    async fn put(&self, key: &str, snapshot: Arc<CatalogSnapshot>);

    /// The stored entry for `key` even if it expired
    async fn get_stale(&self, key: &str) -> Option<Arc<CatalogSnapshot>>;
}

/// [`CatalogCache`] over a [`SnapshotBackend`]
///
/// The backend is only read when no fresh entry is held in memory for the key.
#[derive(Debug)]
pub struct CacheDriver<B> {
    backend: B,
    /// `None` never expires
    ttl: Option<Duration>,
    time_provider: Arc<dyn TimeProvider>,
    /// Last entry read or written per key
    entries: Mutex<HashMap<String, CachedSnapshot>>,
    /// One lock per key, held while loading that key
    loading: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<B: SnapshotBackend> CacheDriver<B> {
    pub fn new(backend: B, ttl: Option<Duration>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            backend,
            ttl,
            time_provider,
            entries: Default::default(),
            loading: Default::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn stored(&self, key: &str) -> Option<CachedSnapshot> {
        match self.backend.get(key).await {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%key, %error, "cannot read catalog cache entry, treating it as a miss");
                None
            }
        }
    }

    async fn fresh(&self, key: &str) -> Option<Arc<CatalogSnapshot>> {
        let now = self.time_provider.now();
        let in_memory = self
            .entries
            .lock()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| Arc::clone(&entry.snapshot));
        if in_memory.is_some() {
            return in_memory;
        }

        let entry = self.stored(key).await?;
        if entry.is_expired(now) {
            debug!(%key, expires_at = ?entry.expires_at, "catalog cache entry expired");
            return None;
        }
        let snapshot = Arc::clone(&entry.snapshot);
        self.entries.lock().insert(key.to_string(), entry);
        Some(snapshot)
    }

    fn expires_at(&self, now: Time) -> Option<Time> {
        self.ttl.and_then(|ttl| now.checked_add(ttl))
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.loading.lock().entry(key.to_string()).or_default())
    }
}

#[async_trait]
impl<B: SnapshotBackend> CatalogCache for CacheDriver<B> {
    async fn get_with_status(
        &self,
        key: &str,
        loader: &dyn SnapshotLoader,
    ) -> Result<(Arc<CatalogSnapshot>, CacheGetStatus), UpstreamError> {
        if let Some(snapshot) = self.fresh(key).await {
            return Ok((snapshot, CacheGetStatus::Hit));
        }

        let lock = self.key_lock(key);
        let (_guard, status) = match Arc::clone(&lock).try_lock_owned() {
            Ok(guard) => (guard, CacheGetStatus::Miss),
            Err(_) => (lock.lock_owned().await, CacheGetStatus::MissAlreadyLoading),
        };

        // the load we waited for may have stored a fresh entry
        if let Some(snapshot) = self.fresh(key).await {
            return Ok((snapshot, status));
        }

        let snapshot = Arc::new(loader.load_snapshot().await?);
        self.put(key, Arc::clone(&snapshot)).await;
        Ok((snapshot, status))
    }

    async fn put(&self, key: &str, snapshot: Arc<CatalogSnapshot>) {
        let entry = CachedSnapshot {
            snapshot,
            expires_at: self.expires_at(self.time_provider.now()),
        };
        self.entries.lock().insert(key.to_string(), entry.clone());
        if let Err(error) = self.backend.set(key, entry).await {
            warn!(%key, %error, "cannot store catalog cache entry");
        }
    }

    async fn get_stale(&self, key: &str) -> Option<Arc<CatalogSnapshot>> {
        match self.stored(key).await {
            Some(entry) => Some(entry.snapshot),
            None => self
                .entries
                .lock()
                .get(key)
                .map(|entry| Arc::clone(&entry.snapshot)),
        }
    }
}
