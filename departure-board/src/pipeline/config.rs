//! Per-refresh configuration.

use crate::catalog::{Route, TransportCatalog, ViaStop};
use crate::domain::{ProductSet, StationId};
use crate::hafas::AdmissionPolicy;
use crate::retry::DEFAULT_MAX_ATTEMPTS;

/// Default number of connections shown on a board.
pub const DEFAULT_LIMIT: usize = 6;

/// Everything one refresh needs to know, passed in rather than held as
/// global state.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    /// Key under which results are cached.
    pub route_key: String,

    /// Station the journeys start from.
    pub origin: StationId,

    /// Station the journeys end at.
    pub destination: StationId,

    /// Intermediate stops whose arrival times are correlated in.
    pub via: Vec<ViaStop>,

    /// Products allowed to appear in the output.
    pub admissible: ProductSet,

    /// Maximum number of connections returned (at least 1).
    pub limit: usize,

    /// Which legs must satisfy the product rule.
    pub policy: AdmissionPolicy,

    /// Attempts per upstream query, first try included.
    pub max_attempts: u32,
}

impl RefreshConfig {
    /// Create a config with default limit, policy and attempts, and no
    /// via stops.
    pub fn new(
        route_key: impl Into<String>,
        origin: StationId,
        destination: StationId,
        admissible: ProductSet,
    ) -> Self {
        let settings = RefreshSettings::default();
        Self {
            route_key: route_key.into(),
            origin,
            destination,
            via: Vec::new(),
            admissible,
            limit: settings.limit,
            policy: settings.policy,
            max_attempts: settings.max_attempts,
        }
    }

    /// Add a via stop.
    pub fn with_via(mut self, label: impl Into<String>, station: StationId) -> Self {
        self.via.push(ViaStop {
            label: label.into(),
            station,
        });
        self
    }

    /// Set the result limit. Zero is raised to 1.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Set the admission policy.
    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set attempts per upstream query. Zero is raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Application-wide refresh knobs, applied to every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    /// Maximum number of connections per board.
    pub limit: usize,

    /// Which legs must satisfy the product rule.
    pub policy: AdmissionPolicy,

    /// Attempts per upstream query.
    pub max_attempts: u32,
}

impl RefreshSettings {
    /// Build the refresh config for a catalog route.
    pub fn for_route(&self, route: &Route, catalog: &TransportCatalog) -> RefreshConfig {
        let mut config = RefreshConfig::new(
            route.key.clone(),
            route.origin.clone(),
            route.destination.clone(),
            catalog.admissible().clone(),
        )
        .with_limit(self.limit)
        .with_policy(self.policy)
        .with_max_attempts(self.max_attempts);
        config.via = route.via.clone();
        config
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            policy: AdmissionPolicy::EveryLeg,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
