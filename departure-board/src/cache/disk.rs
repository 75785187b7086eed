//! Disk-based connection store.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::domain::Connection;

use super::{CacheConfig, CacheError, CachedBoard, ConnectionStore, is_fresh};

/// Connection store writing one JSON file per route.
///
/// Files are named `{route_key}.json` inside the store directory, which is
/// created on first save. Saved boards survive restarts but are only
/// returned within the TTL.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
    ttl: Duration,
}

impl DiskStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, config: &CacheConfig) -> Self {
        Self {
            dir: dir.into(),
            ttl: config.ttl,
        }
    }

    /// Path of the file for a route. Keys must be plain file stems.
    fn path_for(&self, route_key: &str) -> Result<PathBuf, CacheError> {
        let valid = !route_key.is_empty()
            && route_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CacheError::InvalidKey(route_key.to_string()));
        }
        Ok(self.dir.join(format!("{route_key}.json")))
    }
}

#[async_trait]
impl ConnectionStore for DiskStore {
    async fn save(&self, route_key: &str, connections: &[Connection]) -> Result<(), CacheError> {
        let path = self.path_for(route_key)?;

        let board = CachedBoard {
            cached_at: Utc::now(),
            connections: connections.to_vec(),
        };

        tokio::fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_string_pretty(&board)?;
        tokio::fs::write(&path, json).await?;

        Ok(())
    }

    async fn load(&self, route_key: &str) -> Result<Option<CachedBoard>, CacheError> {
        let path = self.path_for(route_key)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let board: CachedBoard = match serde_json::from_str(&contents) {
            Ok(board) => board,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable cache file");
                return Ok(None);
            }
        };

        if !is_fresh(board.cached_at, Utc::now(), self.ttl) {
            return Ok(None);
        }

        Ok(Some(board))
    }
}
