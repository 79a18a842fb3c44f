//! Persistent summary store
//!
//! Summaries are cached on disk as a single JSON map keyed by article link.
//! Every write lands in a sibling temp file first and is moved into place
//! with a rename, so readers never observe a half-written store and a crash
//! mid-write leaves the previous state intact.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One cached summary with its creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSummary {
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// File-backed key/value store for article summaries
pub struct SummaryStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, StoredSummary>>,
}

impl SummaryStore {
    /// Open the store at `path`, loading any existing entries
    ///
    /// A missing file starts the store empty. An unreadable or corrupt file
    /// is treated the same way, so a damaged cache costs re-summarization
    /// rather than taking the service down.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Summary store at {} is corrupt ({}), starting empty", path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Opened summary store at {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Look up a summary, honoring the TTL
    ///
    /// `ttl = None` means entries never expire. Expired entries are left in
    /// place for [`Self::purge_expired`]; the next successful summarization
    /// overwrites them.
    pub fn get(&self, key: &str, ttl: Option<Duration>, now: DateTime<Utc>) -> Option<String> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;

        if let Some(ttl) = ttl {
            let age = now.signed_duration_since(entry.created_at);
            if age > ttl {
                debug!("Summary for {} expired ({} old)", key, age);
                return None;
            }
        }

        Some(entry.summary.clone())
    }

    /// Insert or overwrite a summary and persist the store
    pub fn insert(&self, key: &str, summary: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        entries.insert(
            key.to_string(),
            StoredSummary {
                summary: summary.to_string(),
                created_at: now,
            },
        );
        self.save(&entries)
    }

    /// Drop entries older than `ttl` and persist if anything was removed
    ///
    /// Returns the number of entries removed. A `ttl` of `None` is a no-op.
    pub fn purge_expired(
        &self,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let Some(ttl) = ttl else { return Ok(0) };

        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.signed_duration_since(entry.created_at) <= ttl);
        let removed = before - entries.len();

        if removed > 0 {
            info!("Purged {} expired summaries", removed);
            self.save(&entries)?;
        }
        Ok(removed)
    }

    /// Number of stored summaries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Write the full map to a temp file, then rename over the store file
    fn save(&self, entries: &HashMap<String, StoredSummary>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
