//! Journey API response DTOs.
//!
//! These types map directly to the transport.rest `/journeys` JSON. Every
//! field is optional: HAFAS omits fields freely (walking legs have no line,
//! cancelled legs have no realtime times) and the normalizer decides what
//! is fatal.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Response body of `GET /journeys`.
///
/// Journeys are kept undecoded so that one bad element does not take the
/// rest of the array down with it; see [`RawJourneysResponse::into_journeys`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourneysResponse {
    /// Matching journeys; absent when the API has nothing to say.
    pub journeys: Option<Vec<Value>>,

    /// Opaque cursor for the next page (unused).
    pub later_ref: Option<String>,
}

impl RawJourneysResponse {
    /// Decode the journeys array element by element.
    ///
    /// Returns `None` if the array is absent. Elements that are not valid
    /// journey objects are dropped with a debug log.
    pub fn into_journeys(self) -> Option<Vec<RawJourney>> {
        let elements = self.journeys?;
        let total = elements.len();

        let journeys: Vec<RawJourney> = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| match serde_json::from_value(element) {
                Ok(journey) => Some(journey),
                Err(e) => {
                    debug!(index, error = %e, "dropping undecodable journey");
                    None
                }
            })
            .collect();

        if journeys.len() < total {
            debug!(kept = journeys.len(), total, "decoded journeys leniently");
        }

        Some(journeys)
    }
}

/// One door-to-door journey.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourney {
    /// Legs in travel order.
    pub legs: Option<Vec<RawLeg>>,
}

/// One segment of a journey.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
    /// Stop where the leg starts.
    pub origin: Option<RawStop>,

    /// Stop where the leg ends.
    pub destination: Option<RawStop>,

    /// Realtime departure (ISO 8601 with offset).
    pub departure: Option<String>,

    /// Timetabled departure.
    pub planned_departure: Option<String>,

    /// Departure delay in seconds.
    pub departure_delay: Option<i64>,

    /// Realtime arrival.
    pub arrival: Option<String>,

    /// Timetabled arrival.
    pub planned_arrival: Option<String>,

    /// Realtime departure platform.
    pub departure_platform: Option<String>,

    /// Timetabled departure platform.
    pub planned_departure_platform: Option<String>,

    /// Direction text shown on the vehicle.
    pub direction: Option<String>,

    /// Line ridden; absent for walking legs.
    pub line: Option<RawLine>,

    /// Set on walking (transfer) legs.
    pub walking: Option<bool>,
}

/// Line information of a vehicle leg.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLine {
    /// Display name, e.g. "S5" or "RE1 (Magdeburg)".
    pub name: Option<String>,

    /// HAFAS product id, e.g. "suburban".
    pub product: Option<String>,

    /// Coarse mode, e.g. "train" or "bus".
    pub mode: Option<String>,
}

/// A stop or station reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStop {
    /// HAFAS stop id.
    pub id: Option<String>,

    /// Human-readable name.
    pub name: Option<String>,
}
