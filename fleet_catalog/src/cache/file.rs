//! Durable cache storage: one JSON document per key in a directory.
use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use iox_time::Time;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{CachedSnapshot, Error, SnapshotBackend};
use crate::CatalogSnapshot;

#[derive(Debug, Serialize)]
struct EntryRef<'a> {
    expires_at_nanos: Option<i64>,
    ships: &'a CatalogSnapshot,
}

#[derive(Debug, Deserialize)]
struct Entry {
    expires_at_nanos: Option<i64>,
    ships: CatalogSnapshot,
}

/// Stores each entry in `<dir>/<key>.json`
///
/// Each write goes to its own temporary file in the same directory, then is renamed over the
/// previous entry. Readers never see a partially written entry, and concurrent writers, in this
/// process or another, each replace the entry as a whole.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// The directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl SnapshotBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<CachedSnapshot>, Error> {
        let path = self.path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path)(e)),
        };
        let entry: Entry = serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            path: path.clone(),
            source,
        })?;

        Ok(Some(CachedSnapshot {
            snapshot: Arc::new(entry.ships),
            expires_at: entry.expires_at_nanos.map(Time::from_timestamp_nanos),
        }))
    }

    async fn set(&self, key: &str, entry: CachedSnapshot) -> Result<(), Error> {
        let path = self.path(key);
        let bytes = serde_json::to_vec(&EntryRef {
            expires_at_nanos: entry.expires_at.map(|t| t.timestamp_nanos()),
            ships: &entry.snapshot,
        })
        .map_err(Error::Encode)?;

        let dir = self.dir.clone();
        let persisted = tokio::task::spawn_blocking(move || write_entry(&dir, &path, &bytes)).await;
        match persisted {
            Ok(result) => result,
            Err(e) => Err(Error::Io {
                path: self.path(key),
                source: std::io::Error::other(e),
            }),
        }
    }
}

fn write_entry(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), Error> {
    std::fs::create_dir_all(dir).map_err(io_error(dir))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    tmp.write_all(bytes).map_err(io_error(dir))?;
    tmp.persist(path).map_err(|e| io_error(path)(e.error))?;
    Ok(())
}
