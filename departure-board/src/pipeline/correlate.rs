//! Cross-fetch correlation.
//!
//! A board row for "Alexanderplatz → Zoo" also shows when the same train
//! reaches Hauptbahnhof. That time comes from a second query
//! (Alexanderplatz → Hauptbahnhof); the two result sets are joined on the
//! `CorrelationKey` of each journey.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Connection, CorrelationKey, Journey};

/// Wrap the primary journeys as connections and enrich them from
/// `secondary`.
///
/// See [`enrich`] for the matching rules.
pub fn correlate<K>(
    primary: Vec<Journey>,
    secondary: &[Journey],
    label: &str,
    key: K,
) -> Vec<Connection>
where
    K: Fn(&Journey) -> Option<CorrelationKey>,
{
    let connections = primary.into_iter().map(Connection::new).collect();
    enrich(connections, secondary, label, key)
}

/// Attach the arrival of matching `secondary` journeys under `label`.
///
/// Every connection whose key equals a secondary journey's key receives
/// that journey's overall arrival. The first matching secondary wins.
/// Unmatched secondaries are discarded; unmatched connections are
/// returned unchanged. Order is preserved.
pub fn enrich<K>(
    mut connections: Vec<Connection>,
    secondary: &[Journey],
    label: &str,
    key: K,
) -> Vec<Connection>
where
    K: Fn(&Journey) -> Option<CorrelationKey>,
{
    let mut by_key: HashMap<CorrelationKey, Vec<usize>> = HashMap::new();
    for (i, conn) in connections.iter().enumerate() {
        if let Some(k) = key(&conn.journey) {
            by_key.entry(k).or_default().push(i);
        }
    }

    let mut matched = 0usize;
    let mut discarded = 0usize;

    for journey in secondary {
        let Some(indices) = key(journey).and_then(|k| by_key.get(&k)) else {
            discarded += 1;
            continue;
        };

        for &i in indices {
            if connections[i].attach_arrival(label, journey.arrival()) {
                matched += 1;
            }
        }
    }

    debug!(
        label,
        primary = connections.len(),
        secondary = secondary.len(),
        matched,
        discarded,
        "correlated journeys"
    );

    connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leg, Line, TransportProduct};
    use chrono::{DateTime, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn journey(dep: &str, arr: &str, line: &str) -> Journey {
        Journey::new(vec![Leg::ride(
            at(dep),
            at(arr),
            Line::new(line, TransportProduct::Suburban),
        )])
        .unwrap()
    }

    #[test]
    fn matching_secondary_attaches_arrival() {
        let primary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "S1")];
        let secondary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:20:00Z", "S1")];

        let merged = correlate(primary, &secondary, "Hauptbahnhof", CorrelationKey::of);

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].aux_arrival("Hauptbahnhof"),
            Some(at("2024-01-01T08:20:00Z"))
        );
    }

    #[test]
    fn different_line_is_not_merged() {
        let primary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "S1")];
        let secondary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:20:00Z", "S2")];

        let merged = correlate(primary, &secondary, "Hauptbahnhof", CorrelationKey::of);

        assert_eq!(merged.len(), 1);
        assert!(merged[0].aux_arrivals.is_empty());
    }

    #[test]
    fn first_matching_secondary_wins() {
        let primary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "S1")];
        let secondary = vec![
            journey("2024-01-01T08:00:00Z", "2024-01-01T08:20:00Z", "S1"),
            journey("2024-01-01T08:00:00Z", "2024-01-01T08:25:00Z", "S1"),
        ];

        let merged = correlate(primary, &secondary, "Hauptbahnhof", CorrelationKey::of);

        assert_eq!(
            merged[0].aux_arrival("Hauptbahnhof"),
            Some(at("2024-01-01T08:20:00Z"))
        );
    }

    #[test]
    fn colliding_primaries_all_enriched() {
        let primary = vec![
            journey("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "S1"),
            journey("2024-01-01T08:00:00Z", "2024-01-01T08:45:00Z", "S1"),
        ];
        let secondary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:20:00Z", "S1")];

        let merged = correlate(primary, &secondary, "Hauptbahnhof", CorrelationKey::of);

        assert!(merged.iter().all(|c| c.aux_arrival("Hauptbahnhof").is_some()));
    }

    #[test]
    fn primary_order_preserved_and_unmatched_kept() {
        let primary = vec![
            journey("2024-01-01T08:10:00Z", "2024-01-01T08:40:00Z", "S5"),
            journey("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "S1"),
        ];
        let secondary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:20:00Z", "S1")];

        let merged = correlate(primary, &secondary, "Hauptbahnhof", CorrelationKey::of);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].journey.first_leg().line_name(), Some("S5"));
        assert!(merged[0].aux_arrivals.is_empty());
        assert!(merged[1].aux_arrival("Hauptbahnhof").is_some());
    }

    #[test]
    fn transitive_passes_add_labels() {
        let primary = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "S1")];
        let friedrichstr = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:04:00Z", "S1")];
        let hbf = vec![journey("2024-01-01T08:00:00Z", "2024-01-01T08:09:00Z", "S1")];

        let merged = correlate(primary, &friedrichstr, "Friedrichstr.", CorrelationKey::of);
        let merged = enrich(merged, &hbf, "Hauptbahnhof", CorrelationKey::of);

        assert_eq!(merged[0].aux_arrivals.len(), 2);
        assert_eq!(
            merged[0].aux_arrival("Friedrichstr."),
            Some(at("2024-01-01T08:04:00Z"))
        );
    }

    #[test]
    fn walking_first_leg_never_correlates() {
        let walk_first = Journey::new(vec![
            Leg::walk(at("2024-01-01T07:55:00Z"), at("2024-01-01T08:00:00Z")),
            Leg::ride(
                at("2024-01-01T08:00:00Z"),
                at("2024-01-01T08:30:00Z"),
                Line::new("S1", TransportProduct::Suburban),
            ),
        ])
        .unwrap();

        let merged = correlate(
            vec![walk_first.clone()],
            &[walk_first],
            "Hauptbahnhof",
            CorrelationKey::of,
        );

        assert!(merged[0].aux_arrivals.is_empty());
    }

    #[test]
    fn deterministic() {
        let primary = vec![
            journey("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "S1"),
            journey("2024-01-01T08:05:00Z", "2024-01-01T08:35:00Z", "S5"),
        ];
        let secondary = vec![journey("2024-01-01T08:05:00Z", "2024-01-01T08:15:00Z", "S5")];

        let a = correlate(primary.clone(), &secondary, "x", CorrelationKey::of);
        let b = correlate(primary, &secondary, "x", CorrelationKey::of);
        assert_eq!(a, b);
    }
}
