//! Leg and line types.
//!
//! A `Leg` is one segment of a journey: either a ride on a single vehicle
//! or a walk between stops.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{ProductSet, TransportProduct};

/// The line a vehicle leg runs on.
///
/// Only lines with a known product are represented; the normalizer treats
/// a leg whose upstream line has no recognisable product as inadmissible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Display name, e.g. "S5" or "U2" (already cleaned)
    pub name: String,
    /// Product kind
    pub product: TransportProduct,
}

impl Line {
    /// Create a new line.
    pub fn new(name: impl Into<String>, product: TransportProduct) -> Self {
        Self {
            name: name.into(),
            product,
        }
    }
}

/// One vehicle or walking segment of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    /// Departure (realtime when reported, otherwise planned)
    pub departure: DateTime<FixedOffset>,
    /// Arrival (realtime when reported, otherwise planned)
    pub arrival: DateTime<FixedOffset>,
    /// Line; `None` for walking legs
    pub line: Option<Line>,
    /// Departure platform
    pub platform: Option<String>,
    /// Departure delay in seconds as reported upstream (`None` = unknown)
    pub delay_secs: Option<i64>,
    /// Direction text shown on the vehicle
    pub direction: Option<String>,
    /// Name of the stop where this leg ends
    pub destination: Option<String>,
    /// Whether this is a walking segment
    pub walking: bool,
}

impl Leg {
    /// Create a vehicle leg on the given line.
    pub fn ride(
        departure: DateTime<FixedOffset>,
        arrival: DateTime<FixedOffset>,
        line: Line,
    ) -> Self {
        Self {
            departure,
            arrival,
            line: Some(line),
            platform: None,
            delay_secs: None,
            direction: None,
            destination: None,
            walking: false,
        }
    }

    /// Create a walking leg.
    pub fn walk(departure: DateTime<FixedOffset>, arrival: DateTime<FixedOffset>) -> Self {
        Self {
            departure,
            arrival,
            line: None,
            platform: None,
            delay_secs: None,
            direction: None,
            destination: None,
            walking: true,
        }
    }

    /// Returns true if this is a walking segment.
    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Returns the product of the line, if any.
    pub fn product(&self) -> Option<TransportProduct> {
        self.line.as_ref().map(|l| l.product)
    }

    /// Returns the line name, if any.
    pub fn line_name(&self) -> Option<&str> {
        self.line.as_ref().map(|l| l.name.as_str())
    }

    /// Returns true if the leg is a walk or rides an admissible product.
    pub fn is_admissible(&self, admissible: &ProductSet) -> bool {
        self.walking || self.product().is_some_and(|p| admissible.contains(p))
    }

    /// Departure delay rounded to whole minutes.
    pub fn delay_minutes(&self) -> Option<i64> {
        self.delay_secs.map(|secs| (secs as f64 / 60.0).round() as i64)
    }

    /// Time spent on this leg.
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }
}
