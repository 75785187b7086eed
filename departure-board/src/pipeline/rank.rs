//! Connection selection for the board.

use crate::domain::Connection;

/// Sort connections by departure and keep the first `limit`.
///
/// The sort is stable: connections departing at the same instant keep
/// their input order. A `limit` of zero is treated as 1.
pub fn select(mut connections: Vec<Connection>, limit: usize) -> Vec<Connection> {
    connections.sort_by_key(|c| c.departure());
    connections.truncate(limit.max(1));
    connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Journey, Leg, Line, TransportProduct};
    use chrono::{DateTime, Duration, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn connection(dep: DateTime<FixedOffset>, line: &str) -> Connection {
        Connection::new(
            Journey::new(vec![Leg::ride(
                dep,
                dep + Duration::minutes(20),
                Line::new(line, TransportProduct::Suburban),
            )])
            .unwrap(),
        )
    }

    fn lines(connections: &[Connection]) -> Vec<&str> {
        connections
            .iter()
            .map(|c| c.journey.first_leg().line_name().unwrap_or_default())
            .collect()
    }

    #[test]
    fn sorts_then_truncates() {
        let t1 = at("2024-01-01T08:00:00+01:00");
        let t2 = at("2024-01-01T08:10:00+01:00");
        let t3 = at("2024-01-01T08:20:00+01:00");

        let selected = select(
            vec![connection(t2, "T2"), connection(t1, "T1"), connection(t3, "T3")],
            2,
        );

        assert_eq!(lines(&selected), vec!["T1", "T2"]);
    }

    #[test]
    fn equal_departures_keep_input_order() {
        let t = at("2024-01-01T08:00:00+01:00");
        let selected = select(
            vec![connection(t, "A"), connection(t, "B"), connection(t, "C")],
            6,
        );
        assert_eq!(lines(&selected), vec!["A", "B", "C"]);
    }

    #[test]
    fn sorts_by_instant_across_offsets() {
        // 07:05Z is after 08:00+01:00 (07:00Z)
        let selected = select(
            vec![
                connection(at("2024-01-01T07:05:00Z"), "late"),
                connection(at("2024-01-01T08:00:00+01:00"), "early"),
            ],
            6,
        );
        assert_eq!(lines(&selected), vec!["early", "late"]);
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(select(Vec::new(), 6).is_empty());
    }
}
