//! Transport catalog: the fixed stations and routes the board knows about.
//!
//! The board never takes an origin or destination from the user. Every
//! query runs on a route defined here, between stations whose upstream
//! ids are recorded here, restricted to the admissible products recorded
//! here. There is no logic beyond lookup.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::{ProductSet, StationId};

/// An intermediate stop whose arrival time is shown alongside a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViaStop {
    /// Label used for the auxiliary arrival (the station name)
    pub label: String,
    /// Upstream id of the stop
    pub station: StationId,
}

/// A route shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Stable key, used in URLs and as the cache key
    pub key: String,
    /// Origin station name
    pub origin_name: String,
    /// Origin station id
    pub origin: StationId,
    /// Destination station name
    pub destination_name: String,
    /// Destination station id
    pub destination: StationId,
    /// Intermediate stops, in travel order
    pub via: Vec<ViaStop>,
}

/// Stations, routes and admissible products of one deployment.
#[derive(Debug, Clone, Default)]
pub struct TransportCatalog {
    stations: BTreeMap<String, StationId>,
    routes: Vec<Route>,
    admissible: ProductSet,
}

impl TransportCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a station id by name.
    pub fn station(&self, name: &str) -> Option<&StationId> {
        self.stations.get(name)
    }

    /// Look up a route by key.
    pub fn route(&self, key: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.key == key)
    }

    /// All routes, in definition order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Products allowed to appear on the board.
    pub fn admissible(&self) -> &ProductSet {
        &self.admissible
    }

    /// Number of known stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

/// A route as declared to the builder, by station names.
#[derive(Debug)]
struct PendingRoute {
    key: String,
    origin: String,
    destination: String,
    via: Vec<String>,
}

/// Builder for a transport catalog.
///
/// Stations with invalid ids and routes naming unknown stations are
/// skipped with a warning.
#[derive(Debug, Default)]
pub struct TransportCatalogBuilder {
    stations: BTreeMap<String, StationId>,
    routes: Vec<PendingRoute>,
    admissible: ProductSet,
}

impl TransportCatalogBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a station.
    pub fn station(mut self, name: &str, id: &str) -> Self {
        match StationId::parse(id) {
            Ok(id) => {
                self.stations.insert(name.to_string(), id);
            }
            Err(e) => warn!(station = name, error = %e, "skipping station"),
        }
        self
    }

    /// Add a route between two named stations, with optional via stops.
    pub fn route(mut self, key: &str, origin: &str, destination: &str, via: &[&str]) -> Self {
        self.routes.push(PendingRoute {
            key: key.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            via: via.iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    /// Set the admissible products.
    pub fn admissible(mut self, products: ProductSet) -> Self {
        self.admissible = products;
        self
    }

    /// Build the catalog, resolving route station names.
    pub fn build(self) -> TransportCatalog {
        let stations = self.stations;
        let lookup = |name: &str| stations.get(name).cloned();

        let mut routes: Vec<Route> = Vec::with_capacity(self.routes.len());
        for pending in self.routes {
            if routes.iter().any(|r| r.key == pending.key) {
                warn!(route = %pending.key, "skipping duplicate route key");
                continue;
            }

            let (Some(origin), Some(destination)) =
                (lookup(&pending.origin), lookup(&pending.destination))
            else {
                warn!(route = %pending.key, "skipping route with unknown station");
                continue;
            };

            let via: Option<Vec<ViaStop>> = pending
                .via
                .iter()
                .map(|name| {
                    lookup(name).map(|station| ViaStop {
                        label: name.clone(),
                        station,
                    })
                })
                .collect();
            let Some(via) = via else {
                warn!(route = %pending.key, "skipping route with unknown via stop");
                continue;
            };

            routes.push(Route {
                key: pending.key,
                origin_name: pending.origin,
                origin,
                destination_name: pending.destination,
                destination,
                via,
            });
        }

        TransportCatalog {
            stations,
            routes,
            admissible: self.admissible,
        }
    }
}

/// The default Berlin catalog: the S-Bahn trunk between Alexanderplatz
/// and Zoologischer Garten, plus Ostkreuz.
///
/// Ids are BVG HAFAS ids as served by `v6.bvg.transport.rest`.
pub fn berlin_catalog() -> TransportCatalog {
    TransportCatalogBuilder::new()
        .station("Alexanderplatz", "900100003")
        .station("Friedrichstr.", "900100001")
        .station("Hauptbahnhof", "900003201")
        .station("Zoologischer Garten", "900023201")
        .station("Ostkreuz", "900120003")
        .route(
            "alexanderplatz-zoo",
            "Alexanderplatz",
            "Zoologischer Garten",
            &["Friedrichstr.", "Hauptbahnhof"],
        )
        .route(
            "zoo-alexanderplatz",
            "Zoologischer Garten",
            "Alexanderplatz",
            &[],
        )
        .route("ostkreuz-alexanderplatz", "Ostkreuz", "Alexanderplatz", &[])
        .admissible(ProductSet::rail())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportProduct;

    #[test]
    fn empty_catalog() {
        let catalog = TransportCatalog::new();
        assert_eq!(catalog.station_count(), 0);
        assert!(catalog.routes().is_empty());
        assert!(catalog.route("anything").is_none());
        assert!(catalog.admissible().is_empty());
    }

    #[test]
    fn builder_resolves_routes() {
        let catalog = TransportCatalogBuilder::new()
            .station("A", "1")
            .station("B", "2")
            .station("C", "3")
            .route("a-c", "A", "C", &["B"])
            .admissible(ProductSet::new().with(TransportProduct::Subway))
            .build();

        let route = catalog.route("a-c").unwrap();
        assert_eq!(route.origin.as_str(), "1");
        assert_eq!(route.destination.as_str(), "3");
        assert_eq!(route.via.len(), 1);
        assert_eq!(route.via[0].label, "B");
        assert_eq!(route.via[0].station.as_str(), "2");
        assert!(catalog.admissible().contains(TransportProduct::Subway));
    }

    #[test]
    fn builder_skips_invalid_station_ids() {
        let catalog = TransportCatalogBuilder::new()
            .station("Bad", "not an id")
            .station("Good", "42")
            .build();

        assert_eq!(catalog.station_count(), 1);
        assert!(catalog.station("Bad").is_none());
    }

    #[test]
    fn builder_skips_routes_with_unknown_stations() {
        let catalog = TransportCatalogBuilder::new()
            .station("A", "1")
            .station("B", "2")
            .route("ok", "A", "B", &[])
            .route("missing-dest", "A", "Nowhere", &[])
            .route("missing-via", "A", "B", &["Nowhere"])
            .build();

        assert_eq!(catalog.routes().len(), 1);
        assert!(catalog.route("ok").is_some());
    }

    #[test]
    fn builder_skips_duplicate_keys() {
        let catalog = TransportCatalogBuilder::new()
            .station("A", "1")
            .station("B", "2")
            .route("r", "A", "B", &[])
            .route("r", "B", "A", &[])
            .build();

        assert_eq!(catalog.routes().len(), 1);
        assert_eq!(catalog.route("r").unwrap().origin.as_str(), "1");
    }

    #[test]
    fn berlin_catalog_routes() {
        let catalog = berlin_catalog();

        assert_eq!(catalog.routes().len(), 3);
        let route = catalog.route("alexanderplatz-zoo").unwrap();
        assert_eq!(route.origin.as_str(), "900100003");
        assert_eq!(route.destination.as_str(), "900023201");
        let labels: Vec<_> = route.via.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["Friedrichstr.", "Hauptbahnhof"]);

        assert!(catalog.admissible().contains(TransportProduct::Suburban));
        assert!(!catalog.admissible().contains(TransportProduct::Bus));
    }
}
