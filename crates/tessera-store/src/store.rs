//! Bounded snapshot list with per-URL version chains
//!
//! The whole list lives under one backend key, newest first. Retention is by
//! insertion order across all URLs, so an old member of a still-active chain
//! can be evicted while later versions keep pointing at it through
//! `parentId`/`rootId`. [`SnapshotStore::version_history`] then returns only
//! the retained members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tessera_core::hash::short_digest;
use tessera_core::StoreConfig;
use uuid::Uuid;

use crate::backend::{MemoryBackend, StorageBackend};
use crate::snapshot::{Capture, Snapshot};
use crate::StorageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total: usize,
    pub capacity: usize,
    pub by_format: BTreeMap<String, usize>,
    pub distinct_urls: usize,
    pub newest: Option<DateTime<Utc>>,
    pub oldest: Option<DateTime<Utc>>,
}

pub struct SnapshotStore {
    backend: Box<dyn StorageBackend>,
    config: StoreConfig,
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(backend: Box<dyn StorageBackend>, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory(config: StoreConfig) -> Self {
        Self::new(Box::new(MemoryBackend::new()), config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn load(&self) -> Result<Vec<Snapshot>, StorageError> {
        match self.backend.get(&self.config.storage_key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, snapshots: &[Snapshot]) -> Result<(), StorageError> {
        let json = serde_json::to_string(snapshots)?;
        self.backend.set(&self.config.storage_key, &json)
    }

    /// Persist a capture as the next version of its URL's chain.
    ///
    /// Lookup, version computation and the write happen under one lock, so
    /// concurrent saves never hand out the same version twice.
    pub fn save(&self, capture: Capture, source: &str) -> Result<Snapshot, StorageError> {
        if capture.source_url.trim().is_empty() {
            return Err(StorageError::MissingUrl);
        }
        if self.config.capacity == 0 {
            return Err(StorageError::ZeroCapacity);
        }
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut snapshots = self.load()?;
        let content_hash = short_digest(capture.content_bytes()?, self.config.content_hash_len);
        let head = snapshots
            .iter()
            .find(|s| s.source_url == capture.source_url);

        if self.config.dedupe_identical {
            if let Some(head) = head {
                if head.content_hash == content_hash && head.format == capture.format {
                    tracing::info!(id = %head.id, url = %head.source_url, "content unchanged, keeping existing snapshot");
                    return Ok(head.clone());
                }
            }
        }

        let id = format!("snap-{}", Uuid::new_v4());
        let (version, parent_id, root_id) = match head {
            Some(head) => (head.version + 1, Some(head.id.clone()), head.root_id.clone()),
            None => (1, None, id.clone()),
        };

        let snapshot = Snapshot {
            id,
            source_url: capture.source_url,
            title: capture.title,
            platform: capture.platform,
            format: capture.format,
            content: capture.content,
            content_hash,
            version,
            parent_id,
            root_id,
            saved_at: Utc::now(),
            source: source.to_string(),
            message_count: capture.message_count,
        };

        snapshots.insert(0, snapshot.clone());
        let evicted = snapshots.len().saturating_sub(self.config.capacity);
        snapshots.truncate(self.config.capacity);
        self.persist(&snapshots)?;

        tracing::info!(
            id = %snapshot.id,
            url = %snapshot.source_url,
            version = snapshot.version,
            format = %snapshot.format,
            evicted,
            "saved snapshot"
        );
        Ok(snapshot)
    }

    /// Newest first. A failed read logs a warning and yields nothing.
    pub fn list(&self) -> Vec<Snapshot> {
        match self.load() {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::warn!(key = %self.config.storage_key, "cannot read snapshots: {}", e);
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Snapshot> {
        self.list().into_iter().find(|s| s.id == id)
    }

    /// Remove one snapshot. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut snapshots = self.load()?;
        let before = snapshots.len();
        snapshots.retain(|s| s.id != id);
        if snapshots.len() == before {
            return Ok(false);
        }
        self.persist(&snapshots)?;
        tracing::info!(id, "deleted snapshot");
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        self.backend.remove(&self.config.storage_key)?;
        tracing::info!(key = %self.config.storage_key, "cleared snapshots");
        Ok(())
    }

    /// Retained members of the chain rooted at `root_id`, oldest version first
    pub fn version_history(&self, root_id: &str) -> Vec<Snapshot> {
        let mut chain: Vec<Snapshot> = self
            .list()
            .into_iter()
            .filter(|s| s.root_id == root_id || s.id == root_id)
            .collect();
        chain.sort_by_key(|s| s.version);
        chain
    }

    pub fn latest_for_url(&self, url: &str) -> Option<Snapshot> {
        self.list().into_iter().find(|s| s.source_url == url)
    }

    pub fn stats(&self) -> StoreStats {
        let snapshots = self.list();
        let mut by_format = BTreeMap::new();
        let mut urls: Vec<&str> = Vec::new();
        for s in &snapshots {
            *by_format.entry(s.format.to_string()).or_insert(0) += 1;
            if !urls.contains(&s.source_url.as_str()) {
                urls.push(&s.source_url);
            }
        }
        StoreStats {
            total: snapshots.len(),
            capacity: self.config.capacity,
            by_format,
            distinct_urls: urls.len(),
            newest: snapshots.first().map(|s| s.saved_at),
            oldest: snapshots.last().map(|s| s.saved_at),
        }
    }
}
