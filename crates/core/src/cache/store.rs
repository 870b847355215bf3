//! File-backed cache store.
//!
//! The cache is one JSON document. Reads never fail: a missing or corrupt
//! document loads as an empty map. Writes go to a temp file in the same
//! directory which is then renamed over the document, so a reader sees
//! either the previous document or the new one, never a torn write.
//!
//! Every write is a full read-modify-write cycle ([`CacheStore::record`])
//! serialized by one lock, so concurrent writers for different keys never
//! drop each other's entries.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::entry::{CacheEntry, CacheMap};
use crate::Error;

/// Cache store handle.
///
/// Shared behind an `Arc`; owns the document path and the write lock.
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document.
    ///
    /// Any read or parse failure yields an empty map.
    pub async fn load(&self) -> CacheMap {
        match self.try_load().await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, "cache unreadable, treating as empty");
                CacheMap::new()
            }
        }
    }

    async fn try_load(&self) -> Result<CacheMap, Error> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no cache document yet");
                return Ok(CacheMap::new());
            }
            Err(e) => return Err(Error::CacheRead { path: self.path.clone(), reason: e.to_string() }),
        };

        serde_json::from_slice(&bytes).map_err(|e| Error::CacheRead { path: self.path.clone(), reason: e.to_string() })
    }

    /// Persist the whole map, replacing the document atomically.
    ///
    /// On failure the previous document is left as it was and a warning is
    /// logged; the error is returned for callers that care. Callers must hold
    /// the write lock and have reloaded the map under it; see [`Self::record`].
    pub(crate) async fn save(&self, map: &CacheMap) -> Result<(), Error> {
        let result = match serde_json::to_vec(map) {
            Ok(bytes) => {
                let path = self.path.clone();
                tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
                    .await
                    .unwrap_or_else(|e| Err(Error::CacheWrite { path: self.path.clone(), reason: e.to_string() }))
            }
            Err(e) => Err(Error::CacheWrite { path: self.path.clone(), reason: e.to_string() }),
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, "could not save cache");
        }
        result
    }

    /// Look up `key` in a loaded map.
    pub fn get<'a>(map: &'a CacheMap, key: &str) -> Option<&'a CacheEntry> {
        map.get(key)
    }

    /// Insert or overwrite `key`. No I/O.
    pub fn put(mut map: CacheMap, key: impl Into<String>, entry: CacheEntry) -> CacheMap {
        map.insert(key.into(), entry);
        map
    }

    /// Write one entry: lock, reload, insert, save.
    ///
    /// The reload happens inside the lock so that entries written by other
    /// tasks since the caller's own snapshot are preserved.
    pub async fn record(&self, key: &str, entry: CacheEntry) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        let map = Self::put(self.load().await, key, entry);
        self.save(&map).await
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let write_err = |reason: String| Error::CacheWrite { path: path.to_path_buf(), reason };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    tmp.write_all(bytes).map_err(|e| write_err(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| write_err(e.to_string()))?;
    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;

    Ok(())
}
