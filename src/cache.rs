use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Storage for raw scorecard payloads, keyed by round id.
///
/// A finished round never changes on the site, so a cached payload lets a
/// re-run skip the navigation entirely.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the cached payload for `round_id` unless it is missing or expired.
    async fn get(&self, round_id: &str) -> Option<String>;
    /// Stores `payload` for `round_id` for `ttl`.
    async fn set(&self, round_id: &str, payload: &str, ttl: Duration) -> std::io::Result<()>;
    /// Drops the entry for `round_id`, if any.
    async fn delete(&self, round_id: &str) -> std::io::Result<()>;
}

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    payload: String,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// One JSON file per round under a cache directory.
pub struct FileCache {
    cache_dir: PathBuf,
}

impl FileCache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the entry file. Characters outside `[A-Za-z0-9_-]` are replaced
    /// so a round id can never escape the cache directory.
    pub fn entry_path(&self, round_id: &str) -> PathBuf {
        let safe: String = round_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("round_{}.json", safe))
    }
}

#[async_trait]
impl CacheBackend for FileCache {
    async fn get(&self, round_id: &str) -> Option<String> {
        let path = self.entry_path(round_id);
        let content = fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;

        if entry.expires_at < Utc::now() {
            let _ = fs::remove_file(&path).await;
            return None;
        }

        Some(entry.payload)
    }

    async fn set(&self, round_id: &str, payload: &str, ttl: Duration) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;

        let path = self.entry_path(round_id);
        let tmp_path = path.with_extension("tmp");

        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let entry = CacheEntry {
            payload: payload.to_string(),
            cached_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let json = serde_json::to_string(&entry)?;

        // Atomic write: write to tmp then rename
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;

        Ok(())
    }

    async fn delete(&self, round_id: &str) -> std::io::Result<()> {
        match fs::remove_file(self.entry_path(round_id)).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
