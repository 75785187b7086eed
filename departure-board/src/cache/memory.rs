//! In-memory connection store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache as MokaCache;

use crate::domain::Connection;

use super::{CacheConfig, CacheError, CachedBoard, ConnectionStore};

/// Connection store backed by a moka cache.
///
/// Entries expire after the configured TTL. Nothing survives a restart.
#[derive(Clone)]
pub struct MemoryStore {
    boards: MokaCache<String, Arc<CachedBoard>>,
}

impl MemoryStore {
    /// Create a new store with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { boards }
    }
}

#[async_trait]
impl ConnectionStore for MemoryStore {
    async fn save(&self, route_key: &str, connections: &[Connection]) -> Result<(), CacheError> {
        let board = CachedBoard {
            cached_at: Utc::now(),
            connections: connections.to_vec(),
        };
        self.boards
            .insert(route_key.to_string(), Arc::new(board))
            .await;
        Ok(())
    }

    async fn load(&self, route_key: &str) -> Result<Option<CachedBoard>, CacheError> {
        Ok(self
            .boards
            .get(route_key)
            .await
            .map(|board| board.as_ref().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Journey, Leg, Line, TransportProduct};
    use chrono::DateTime;
    use std::time::Duration;

    fn connection() -> Connection {
        let dep = DateTime::parse_from_rfc3339("2024-01-01T08:00:00+01:00").unwrap();
        let arr = DateTime::parse_from_rfc3339("2024-01-01T08:20:00+01:00").unwrap();
        Connection::new(
            Journey::new(vec![Leg::ride(
                dep,
                arr,
                Line::new("S5", TransportProduct::Suburban),
            )])
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn save_and_load() {
        let store = MemoryStore::new(&CacheConfig::default());

        store
            .save("alexanderplatz-zoo", &[connection()])
            .await
            .unwrap();

        let loaded = store.load("alexanderplatz-zoo").await.unwrap().unwrap();
        assert_eq!(loaded.connections, vec![connection()]);
        assert!(store.load("zoo-alexanderplatz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_previous_entry() {
        let store = MemoryStore::new(&CacheConfig::default());

        store.save("r", &[connection(), connection()]).await.unwrap();
        store.save("r", &[connection()]).await.unwrap();

        let loaded = store.load("r").await.unwrap().unwrap();
        assert_eq!(loaded.connections.len(), 1);
    }

    #[tokio::test]
    async fn entries_expire() {
        let config = CacheConfig::default().with_ttl(Duration::from_millis(50));
        let store = MemoryStore::new(&config);

        store.save("r", &[connection()]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(store.load("r").await.unwrap().is_none());
    }
}
