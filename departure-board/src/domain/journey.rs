//! Journey type.
//!
//! A `Journey` is one door-to-door result of the journey API: one or more
//! legs in travel order. Departure, arrival, duration and transfer count
//! are derived from the legs, never stored.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{DomainError, Leg};

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JourneyData", into = "JourneyData")]
pub struct Journey {
    legs: Vec<Leg>,
}

#[derive(Serialize, Deserialize)]
struct JourneyData {
    legs: Vec<Leg>,
}

impl TryFrom<JourneyData> for Journey {
    type Error = DomainError;

    fn try_from(data: JourneyData) -> Result<Self, Self::Error> {
        Journey::new(data.legs)
    }
}

impl From<Journey> for JourneyData {
    fn from(journey: Journey) -> Self {
        JourneyData { legs: journey.legs }
    }
}

impl Journey {
    /// Constructs a journey from its legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `legs` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::DateTime;
    /// use departure_board::domain::{Journey, Leg, Line, TransportProduct};
    ///
    /// let dep = DateTime::parse_from_rfc3339("2024-01-01T08:00:00+01:00").unwrap();
    /// let arr = DateTime::parse_from_rfc3339("2024-01-01T08:18:00+01:00").unwrap();
    /// let leg = Leg::ride(dep, arr, Line::new("S5", TransportProduct::Suburban));
    ///
    /// let journey = Journey::new(vec![leg]).unwrap();
    /// assert_eq!(journey.duration_minutes(), 18);
    /// assert_eq!(journey.transfers(), 0);
    ///
    /// assert!(Journey::new(vec![]).is_err());
    /// ```
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        Ok(Journey { legs })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the first leg.
    pub fn first_leg(&self) -> &Leg {
        &self.legs[0]
    }

    /// Returns the last leg.
    pub fn last_leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    /// Returns the first vehicle (non-walking) leg, if any.
    pub fn first_ride(&self) -> Option<&Leg> {
        self.legs.iter().find(|l| !l.is_walking())
    }

    /// Departure of the first leg.
    pub fn departure(&self) -> DateTime<FixedOffset> {
        self.first_leg().departure
    }

    /// Arrival of the last leg.
    pub fn arrival(&self) -> DateTime<FixedOffset> {
        self.last_leg().arrival
    }

    /// Door-to-door duration in whole minutes, rounded to nearest.
    pub fn duration_minutes(&self) -> i64 {
        let millis = self
            .arrival()
            .signed_duration_since(self.departure())
            .num_milliseconds();
        (millis as f64 / 60_000.0).round() as i64
    }

    /// Number of vehicle legs.
    pub fn ride_count(&self) -> usize {
        self.legs.iter().filter(|l| !l.is_walking()).count()
    }

    /// Number of transfers: vehicle legs minus one, never negative.
    pub fn transfers(&self) -> usize {
        self.ride_count().saturating_sub(1)
    }

    /// Returns true if every leg is a walk.
    pub fn is_walk_only(&self) -> bool {
        self.ride_count() == 0
    }
}
