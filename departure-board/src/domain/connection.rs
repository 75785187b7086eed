//! Connections and the correlation key used to build them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::Journey;

/// Heuristic identity of a vehicle run, used to match the same train
/// across separate journey queries.
///
/// The key is the journey's departure instant plus the line name of its
/// first leg. Two journeys with equal keys are *assumed* to ride the same
/// vehicle. Two different vehicles of the same line leaving at the same
/// instant (e.g. from different platforms of a large station) would
/// collide; nothing here detects that.
///
/// Journeys whose first leg is a walk have no key: the departure of a walk
/// says nothing about which vehicle follows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationKey {
    departure: DateTime<Utc>,
    line: String,
}

impl CorrelationKey {
    /// Build a key from its parts.
    pub fn new(departure: DateTime<Utc>, line: impl Into<String>) -> Self {
        Self {
            departure,
            line: line.into(),
        }
    }

    /// Derive the key of a journey, if its first leg rides a line.
    pub fn of(journey: &Journey) -> Option<Self> {
        let first = journey.first_leg();
        let line = first.line_name()?;
        Some(Self::new(first.departure.with_timezone(&Utc), line))
    }

    /// Departure instant of the key.
    pub fn departure(&self) -> DateTime<Utc> {
        self.departure
    }

    /// Line name of the key.
    pub fn line(&self) -> &str {
        &self.line
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.line, self.departure.to_rfc3339())
    }
}

/// A journey enriched with arrival times correlated from sibling queries.
///
/// Auxiliary arrivals are keyed by a label (usually the name of an
/// intermediate station) and ordered by label for stable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The underlying journey
    pub journey: Journey,
    /// Named auxiliary arrivals
    #[serde(default)]
    pub aux_arrivals: BTreeMap<String, DateTime<FixedOffset>>,
}

impl Connection {
    /// Wrap a journey with no auxiliary arrivals.
    pub fn new(journey: Journey) -> Self {
        Self {
            journey,
            aux_arrivals: BTreeMap::new(),
        }
    }

    /// Overall departure of the journey.
    pub fn departure(&self) -> DateTime<FixedOffset> {
        self.journey.departure()
    }

    /// Look up an auxiliary arrival by label.
    pub fn aux_arrival(&self, label: &str) -> Option<DateTime<FixedOffset>> {
        self.aux_arrivals.get(label).copied()
    }

    /// Attach an auxiliary arrival unless one with the same label exists.
    ///
    /// Returns true if the arrival was attached.
    pub fn attach_arrival(&mut self, label: &str, arrival: DateTime<FixedOffset>) -> bool {
        if self.aux_arrivals.contains_key(label) {
            return false;
        }
        self.aux_arrivals.insert(label.to_string(), arrival);
        true
    }

    /// Correlation key of the underlying journey.
    pub fn key(&self) -> Option<CorrelationKey> {
        CorrelationKey::of(&self.journey)
    }
}

impl From<Journey> for Connection {
    fn from(journey: Journey) -> Self {
        Connection::new(journey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leg, Line, TransportProduct};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn journey(dep: &str, line: &str) -> Journey {
        Journey::new(vec![Leg::ride(
            at(dep),
            at("2024-01-01T09:00:00Z"),
            Line::new(line, TransportProduct::Suburban),
        )])
        .unwrap()
    }

    #[test]
    fn key_uses_instant_not_offset() {
        let a = CorrelationKey::of(&journey("2024-01-01T08:00:00Z", "S1")).unwrap();
        let b = CorrelationKey::of(&journey("2024-01-01T09:00:00+01:00", "S1")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn key_distinguishes_lines() {
        let a = CorrelationKey::of(&journey("2024-01-01T08:00:00Z", "S1"));
        let b = CorrelationKey::of(&journey("2024-01-01T08:00:00Z", "S2"));
        assert_ne!(a, b);
    }

    #[test]
    fn walking_first_leg_has_no_key() {
        let j = Journey::new(vec![
            Leg::walk(at("2024-01-01T07:55:00Z"), at("2024-01-01T08:00:00Z")),
            Leg::ride(
                at("2024-01-01T08:00:00Z"),
                at("2024-01-01T08:20:00Z"),
                Line::new("S1", TransportProduct::Suburban),
            ),
        ])
        .unwrap();
        assert!(CorrelationKey::of(&j).is_none());
    }

    #[test]
    fn key_display() {
        let key = CorrelationKey::of(&journey("2024-01-01T08:00:00Z", "S1")).unwrap();
        assert_eq!(key.to_string(), "S1@2024-01-01T08:00:00+00:00");
        assert_eq!(key.line(), "S1");
    }

    #[test]
    fn attach_arrival_keeps_first() {
        let mut conn = Connection::new(journey("2024-01-01T08:00:00Z", "S1"));

        assert!(conn.attach_arrival("Hauptbahnhof", at("2024-01-01T08:09:00Z")));
        assert!(!conn.attach_arrival("Hauptbahnhof", at("2024-01-01T08:30:00Z")));
        assert_eq!(
            conn.aux_arrival("Hauptbahnhof"),
            Some(at("2024-01-01T08:09:00Z"))
        );
        assert_eq!(conn.aux_arrival("Friedrichstr."), None);
    }

    #[test]
    fn connection_json_roundtrip_keeps_aux_arrivals() {
        let mut conn = Connection::new(journey("2024-01-01T08:00:00Z", "S1"));
        conn.attach_arrival("Hauptbahnhof", at("2024-01-01T09:09:00+01:00"));

        let json = serde_json::to_string(&conn).unwrap();
        let back: Connection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, conn);
    }
}
