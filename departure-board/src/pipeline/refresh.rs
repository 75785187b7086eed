//! Refresh orchestration.
//!
//! `run_refresh` is one pass of the pipeline: fetch, normalize, correlate,
//! select. `RefreshService` wraps it with the last-good fallback so that a
//! failed or empty refresh still shows something.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CachedBoard, ConnectionStore};
use crate::domain::{Connection, CorrelationKey, Journey, ProductSet, StationId};
use crate::hafas::{HafasError, Normalizer, RawJourney};

use super::config::RefreshConfig;
use super::correlate::{correlate, enrich};
use super::rank::select;

/// Where raw journeys come from.
///
/// Implemented by the HTTP client and by the fixture source. An
/// implementation exhausting its retries returns `Ok` with no journeys;
/// `Err` means retrying could not help.
#[async_trait]
pub trait JourneySource: Send + Sync {
    /// Raw journeys from `origin` to `destination`.
    async fn journeys(
        &self,
        origin: &StationId,
        destination: &StationId,
        products: &ProductSet,
        max_attempts: u32,
    ) -> Result<Vec<RawJourney>, HafasError>;
}

/// Errors from a refresh.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// An upstream query failed permanently
    #[error("journeys {from} -> {to} failed: {source}")]
    Fetch {
        from: StationId,
        to: StationId,
        #[source]
        source: HafasError,
    },
}

/// Result of one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Route the board belongs to.
    pub route_key: String,
    /// Selected connections, earliest first.
    pub connections: Vec<Connection>,
    /// When the pass ran.
    pub fetched_at: DateTime<Utc>,
}

/// Fetch one station pair and normalize the result.
async fn fetch_normalized(
    source: &dyn JourneySource,
    config: &RefreshConfig,
    normalizer: &Normalizer,
    destination: &StationId,
) -> Result<Vec<Journey>, RefreshError> {
    let raw = source
        .journeys(
            &config.origin,
            destination,
            &config.admissible,
            config.max_attempts,
        )
        .await
        .map_err(|e| RefreshError::Fetch {
            from: config.origin.clone(),
            to: destination.clone(),
            source: e,
        })?;

    Ok(normalizer.normalize(&raw))
}

/// Run one refresh: fetch the route and every via stop concurrently,
/// normalize each, correlate via arrivals into the route's journeys and
/// select the earliest `config.limit`.
#[instrument(skip_all, fields(route = %config.route_key))]
pub async fn run_refresh(
    source: &dyn JourneySource,
    config: &RefreshConfig,
) -> Result<Board, RefreshError> {
    let normalizer = Normalizer::new(config.admissible.clone()).with_policy(config.policy);

    let targets = std::iter::once(&config.destination).chain(config.via.iter().map(|v| &v.station));
    let results = join_all(
        targets.map(|destination| fetch_normalized(source, config, &normalizer, destination)),
    )
    .await;

    let mut fetched = results
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let primary = fetched.next().unwrap_or_default();

    let mut passes = config.via.iter().zip(fetched);
    let mut connections = match passes.next() {
        Some((via, secondary)) => correlate(primary, &secondary, &via.label, CorrelationKey::of),
        None => primary.into_iter().map(Connection::new).collect(),
    };
    for (via, secondary) in passes {
        connections = enrich(connections, &secondary, &via.label, CorrelationKey::of);
    }

    let connections = select(connections, config.limit);
    debug!(count = connections.len(), "refresh complete");

    Ok(Board {
        route_key: config.route_key.clone(),
        connections,
        fetched_at: Utc::now(),
    })
}

/// Where a snapshot's connections came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched by this refresh (possibly empty).
    Live { fetched_at: DateTime<Utc> },
    /// Loaded from the store after an empty or failed refresh.
    Offline { cached_at: DateTime<Utc> },
}

/// What the board shows after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    /// Route the board belongs to.
    pub route_key: String,
    /// Connections to display.
    pub connections: Vec<Connection>,
    /// Live or cached.
    pub freshness: Freshness,
}

impl BoardSnapshot {
    /// Returns true if the connections were loaded from the store.
    pub fn is_offline(&self) -> bool {
        matches!(self.freshness, Freshness::Offline { .. })
    }
}

/// Refreshes boards and falls back to the last good board.
#[derive(Clone)]
pub struct RefreshService {
    source: Arc<dyn JourneySource>,
    store: Arc<dyn ConnectionStore>,
}

impl RefreshService {
    /// Create a service over a journey source and a store.
    pub fn new(source: Arc<dyn JourneySource>, store: Arc<dyn ConnectionStore>) -> Self {
        Self { source, store }
    }

    /// Refresh a board.
    ///
    /// A non-empty result is saved and returned as live. An empty result
    /// or a failure falls back to the saved board, returned as offline. With
    /// nothing saved, an empty result is returned as a live empty board and
    /// a failure is returned as `Err`. Store errors are logged, never
    /// returned.
    pub async fn refresh(&self, config: &RefreshConfig) -> Result<BoardSnapshot, RefreshError> {
        let route_key = config.route_key.as_str();

        match run_refresh(self.source.as_ref(), config).await {
            Ok(board) if !board.connections.is_empty() => {
                if let Err(e) = self.store.save(route_key, &board.connections).await {
                    warn!(route = route_key, error = %e, "failed to save board");
                }
                info!(
                    route = route_key,
                    count = board.connections.len(),
                    fetched_at = %board.fetched_at,
                    "board refreshed"
                );
                Ok(BoardSnapshot {
                    route_key: board.route_key,
                    connections: board.connections,
                    freshness: Freshness::Live {
                        fetched_at: board.fetched_at,
                    },
                })
            }
            Ok(board) => match self.load(route_key).await {
                Some(cached) => {
                    info!(route = route_key, "refresh returned nothing, showing saved board");
                    Ok(offline(config, cached))
                }
                None => {
                    info!(route = route_key, "no connections");
                    Ok(BoardSnapshot {
                        route_key: board.route_key,
                        connections: Vec::new(),
                        freshness: Freshness::Live {
                            fetched_at: board.fetched_at,
                        },
                    })
                }
            },
            Err(e) => {
                warn!(route = route_key, error = %e, "refresh failed");
                match self.load(route_key).await {
                    Some(cached) => Ok(offline(config, cached)),
                    None => Err(e),
                }
            }
        }
    }

    async fn load(&self, route_key: &str) -> Option<CachedBoard> {
        match self.store.load(route_key).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(route = route_key, error = %e, "failed to load saved board");
                None
            }
        }
    }
}

fn offline(config: &RefreshConfig, cached: CachedBoard) -> BoardSnapshot {
    BoardSnapshot {
        route_key: config.route_key.clone(),
        connections: select(cached.connections, config.limit),
        freshness: Freshness::Offline {
            cached_at: cached.cached_at,
        },
    }
}
