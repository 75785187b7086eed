//! Last-good board storage.
//!
//! After every non-empty refresh the board is saved; when a later refresh
//! comes back empty or fails, the saved board is shown instead, marked as
//! offline. Entries expire after a freshness window (5 minutes by default).

mod disk;
mod memory;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Connection;

pub use disk::DiskStore;
pub use memory::MemoryStore;

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A saved board with the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedBoard {
    /// When the board was saved.
    pub cached_at: DateTime<Utc>,
    /// The saved connections.
    pub connections: Vec<Connection>,
}

/// Errors from a connection store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the backing storage failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded or decoded
    #[error("cache encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Route key cannot be used as a storage key
    #[error("invalid route key: {0:?}")]
    InvalidKey(String),
}

/// Persistence for the last good board of each route.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Save the connections of a route, replacing any earlier entry.
    async fn save(&self, route_key: &str, connections: &[Connection]) -> Result<(), CacheError>;

    /// Load the saved board of a route.
    ///
    /// Returns `Ok(None)` if nothing is saved or the entry has expired.
    async fn load(&self, route_key: &str) -> Result<Option<CachedBoard>, CacheError>;
}

/// Configuration for connection stores.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a saved board stays usable.
    pub ttl: Duration,

    /// Maximum number of routes held in memory.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_capacity: 100,
        }
    }
}

/// Returns true if an entry saved at `cached_at` is still fresh at `now`.
fn is_fresh(cached_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let age = now.signed_duration_since(cached_at);
    match age.to_std() {
        Ok(age) => age < ttl,
        // Saved "in the future" (clock moved back): treat as fresh
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 100);
    }

    #[test]
    fn freshness_window() {
        let saved = Utc::now();
        let ttl = Duration::from_secs(300);

        assert!(is_fresh(saved, saved, ttl));
        assert!(is_fresh(saved, saved + chrono::Duration::seconds(299), ttl));
        assert!(!is_fresh(saved, saved + chrono::Duration::seconds(300), ttl));
        assert!(is_fresh(saved, saved - chrono::Duration::seconds(10), ttl));
    }
}
