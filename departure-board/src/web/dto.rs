//! Data transfer objects for web requests and responses.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Route;
use crate::domain::Connection;
use crate::pipeline::{BoardSnapshot, Freshness};

/// Query parameters of the board endpoint.
#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    /// Maximum number of connections (defaults to the configured limit)
    pub limit: Option<String>,
}

/// A time as shown on the board and as a machine-readable timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeView {
    /// Local wall-clock time, "HH:MM"
    pub time: String,
    /// RFC 3339 timestamp with offset
    pub iso: String,
}

impl TimeView {
    pub fn new(dt: DateTime<FixedOffset>) -> Self {
        Self {
            time: dt.format("%H:%M").to_string(),
            iso: dt.to_rfc3339(),
        }
    }
}

/// Arrival at an intermediate stop.
#[derive(Debug, Clone, Serialize)]
pub struct ViaArrivalView {
    /// Stop label
    pub label: String,
    /// Arrival of the same train at that stop
    pub arrival: TimeView,
}

/// One row of the board.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionView {
    pub departure: TimeView,
    pub arrival: TimeView,
    /// Door-to-door minutes
    pub duration_minutes: i64,
    pub transfers: usize,
    /// Line of the first vehicle leg
    pub line: Option<String>,
    /// Product of the first vehicle leg (wire name)
    pub product: Option<String>,
    pub platform: Option<String>,
    /// Departure delay of the first vehicle leg, rounded to minutes
    pub delay_minutes: Option<i64>,
    pub direction: Option<String>,
    /// Arrivals at via stops, ordered by label
    pub via: Vec<ViaArrivalView>,
}

impl ConnectionView {
    pub fn from_connection(conn: &Connection) -> Self {
        let journey = &conn.journey;
        let ride = journey.first_ride();

        Self {
            departure: TimeView::new(journey.departure()),
            arrival: TimeView::new(journey.arrival()),
            duration_minutes: journey.duration_minutes(),
            transfers: journey.transfers(),
            line: ride.and_then(|l| l.line_name()).map(str::to_string),
            product: ride
                .and_then(|l| l.product())
                .map(|p| p.as_str().to_string()),
            platform: ride.and_then(|l| l.platform.clone()),
            delay_minutes: ride.and_then(|l| l.delay_minutes()),
            direction: ride.and_then(|l| l.direction.clone()),
            via: conn
                .aux_arrivals
                .iter()
                .map(|(label, arrival)| ViaArrivalView {
                    label: label.clone(),
                    arrival: TimeView::new(*arrival),
                })
                .collect(),
        }
    }
}

/// Response of `GET /api/board/:route`.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub route: String,
    /// "live" or "offline"
    pub status: &'static str,
    /// When the live refresh ran (live only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// When the shown connections were saved (offline only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<DateTime<Utc>>,
    pub connections: Vec<ConnectionView>,
}

impl BoardResponse {
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        let (status, fetched_at, cached_at) = match snapshot.freshness {
            Freshness::Live { fetched_at } => ("live", Some(fetched_at), None),
            Freshness::Offline { cached_at } => ("offline", None, Some(cached_at)),
        };

        Self {
            route: snapshot.route_key.clone(),
            status,
            fetched_at,
            cached_at,
            connections: snapshot
                .connections
                .iter()
                .map(ConnectionView::from_connection)
                .collect(),
        }
    }
}

/// A route in `GET /api/routes`.
#[derive(Debug, Serialize)]
pub struct RouteView {
    pub key: String,
    pub origin: String,
    pub destination: String,
    /// Labels of via stops, in order
    pub via: Vec<String>,
}

impl RouteView {
    pub fn from_route(route: &Route) -> Self {
        Self {
            key: route.key.clone(),
            origin: route.origin_name.clone(),
            destination: route.destination_name.clone(),
            via: route.via.iter().map(|v| v.label.clone()).collect(),
        }
    }
}

/// Response of `GET /api/routes`.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteView>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Journey, Leg, Line, TransportProduct};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn connection() -> Connection {
        let mut walk = Leg::walk(
            at("2024-05-01T07:56:00+02:00"),
            at("2024-05-01T08:00:00+02:00"),
        );
        walk.destination = Some("Alexanderplatz".into());

        let mut ride = Leg::ride(
            at("2024-05-01T08:00:00+02:00"),
            at("2024-05-01T08:20:30+02:00"),
            Line::new("S5", TransportProduct::Suburban),
        );
        ride.platform = Some("2".into());
        ride.delay_secs = Some(120);
        ride.direction = Some("Westkreuz".into());

        let mut conn = Connection::new(Journey::new(vec![walk, ride]).unwrap());
        conn.attach_arrival("Hauptbahnhof", at("2024-05-01T08:09:00+02:00"));
        conn
    }

    #[test]
    fn time_view_keeps_local_offset() {
        let view = TimeView::new(at("2024-05-01T08:05:00+02:00"));
        assert_eq!(view.time, "08:05");
        assert_eq!(view.iso, "2024-05-01T08:05:00+02:00");
    }

    #[test]
    fn connection_view_uses_first_ride() {
        let view = ConnectionView::from_connection(&connection());

        assert_eq!(view.departure.time, "07:56");
        assert_eq!(view.arrival.time, "08:20");
        assert_eq!(view.duration_minutes, 25);
        assert_eq!(view.transfers, 0);
        assert_eq!(view.line.as_deref(), Some("S5"));
        assert_eq!(view.product.as_deref(), Some("suburban"));
        assert_eq!(view.platform.as_deref(), Some("2"));
        assert_eq!(view.delay_minutes, Some(2));
        assert_eq!(view.direction.as_deref(), Some("Westkreuz"));
        assert_eq!(view.via.len(), 1);
        assert_eq!(view.via[0].label, "Hauptbahnhof");
        assert_eq!(view.via[0].arrival.time, "08:09");
    }

    #[test]
    fn board_response_status() {
        let fetched_at = Utc::now();
        let live = BoardSnapshot {
            route_key: "r".into(),
            connections: vec![connection()],
            freshness: Freshness::Live { fetched_at },
        };
        let json = serde_json::to_value(BoardResponse::from_snapshot(&live)).unwrap();
        assert_eq!(json["status"], "live");
        assert!(json["fetched_at"].is_string());
        assert!(json.get("cached_at").is_none());
        assert_eq!(json["connections"].as_array().unwrap().len(), 1);

        let cached_at = Utc::now();
        let offline = BoardSnapshot {
            freshness: Freshness::Offline { cached_at },
            ..live
        };
        let response = BoardResponse::from_snapshot(&offline);
        assert_eq!(response.status, "offline");
        assert_eq!(response.cached_at, Some(cached_at));
        assert!(response.fetched_at.is_none());
    }
}
