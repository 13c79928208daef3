use std::{collections::HashMap, fmt::Debug, sync::Arc};

use async_trait::async_trait;
use iox_time::Time;
use parking_lot::RwLock;

use super::Error;
use crate::CatalogSnapshot;

/// A stored snapshot and the instant it stops being fresh
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub snapshot: Arc<CatalogSnapshot>,
    /// `None` never expires
    pub expires_at: Option<Time>,
}

impl CachedSnapshot {
    pub fn is_expired(&self, now: Time) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }
}

/// Storage of a [`CacheDriver`](super::CacheDriver)
#[async_trait]
pub trait SnapshotBackend: Debug + Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<CachedSnapshot>, Error>;

    async fn set(&self, key: &str, entry: CachedSnapshot) -> Result<(), Error>;
}

/// Process local storage, lost on restart
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, CachedSnapshot>>,
}

#[async_trait]
impl SnapshotBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CachedSnapshot>, Error> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, entry: CachedSnapshot) -> Result<(), Error> {
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }
}
