//! Conversion from journey API DTOs to domain types.
//!
//! This module is the filter and normalizer of the pipeline: it decides
//! which upstream journeys are admissible and turns the survivors into
//! validated `Journey` values. A record that cannot be converted is dropped
//! and logged; it never fails the whole batch.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::domain::{Journey, Leg, Line, ProductSet, TransportProduct};

use super::text::{TextCleaner, clean_line_name};
use super::types::{RawJourney, RawLeg};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Journey has no legs, or the field is missing
    #[error("journey has no legs")]
    NoLegs,

    /// Neither realtime nor planned time present
    #[error("leg {index}: missing {field}")]
    MissingTime { index: usize, field: &'static str },

    /// Time present but not ISO 8601 with offset
    #[error("leg {index}: invalid time {value:?}")]
    InvalidTime { index: usize, value: String },

    /// Vehicle leg without a line, or with a product outside the admissible set
    #[error("leg {index}: product not admissible")]
    Inadmissible { index: usize },

    /// First leg must ride an admissible vehicle
    #[error("first leg is not an admissible vehicle leg")]
    FirstLegNotRide,

    /// Every leg is a walk
    #[error("journey has no vehicle legs")]
    WalkOnly,
}

/// Which legs of a journey must satisfy the product rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Every leg must be a walk or ride an admissible product.
    #[default]
    EveryLeg,
    /// As `EveryLeg`, and the first leg must additionally be a vehicle leg.
    FirstLegStrict,
}

/// Filters raw journeys and converts them to domain journeys.
#[derive(Debug, Clone)]
pub struct Normalizer {
    admissible: ProductSet,
    policy: AdmissionPolicy,
    cleaner: TextCleaner,
}

impl Normalizer {
    /// A normalizer with the default policy and Berlin text cleanup.
    pub fn new(admissible: ProductSet) -> Self {
        Self {
            admissible,
            policy: AdmissionPolicy::default(),
            cleaner: TextCleaner::default(),
        }
    }

    /// Set the admission policy.
    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the text cleaner.
    pub fn with_cleaner(mut self, cleaner: TextCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Convert every admissible journey, preserving input order.
    pub fn normalize(&self, raw: &[RawJourney]) -> Vec<Journey> {
        let journeys: Vec<Journey> = raw
            .iter()
            .enumerate()
            .filter_map(|(i, r)| match self.convert_journey(r) {
                Ok(journey) => Some(journey),
                Err(e) => {
                    debug!(journey = i, reason = %e, "dropping journey");
                    None
                }
            })
            .collect();

        debug!(
            received = raw.len(),
            kept = journeys.len(),
            "normalized journeys"
        );
        journeys
    }

    /// Convert a single raw journey.
    pub fn convert_journey(&self, raw: &RawJourney) -> Result<Journey, ConversionError> {
        let raw_legs = raw.legs.as_deref().unwrap_or(&[]);
        if raw_legs.is_empty() {
            return Err(ConversionError::NoLegs);
        }

        let legs = raw_legs
            .iter()
            .enumerate()
            .map(|(i, leg)| self.convert_leg(i, leg))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(index) = legs.iter().position(|l| !l.is_admissible(&self.admissible)) {
            return Err(ConversionError::Inadmissible { index });
        }

        if self.policy == AdmissionPolicy::FirstLegStrict && legs[0].is_walking() {
            return Err(ConversionError::FirstLegNotRide);
        }

        let journey = Journey::new(legs).map_err(|_| ConversionError::NoLegs)?;
        if journey.is_walk_only() {
            return Err(ConversionError::WalkOnly);
        }

        Ok(journey)
    }

    fn convert_leg(&self, index: usize, raw: &RawLeg) -> Result<Leg, ConversionError> {
        let departure = leg_time(
            index,
            "departure",
            raw.departure.as_deref(),
            raw.planned_departure.as_deref(),
        )?;
        let arrival = leg_time(
            index,
            "arrival",
            raw.arrival.as_deref(),
            raw.planned_arrival.as_deref(),
        )?;

        let walking = raw.walking.unwrap_or(false);

        // Unknown products leave the line empty; the leg is then inadmissible
        let line = if walking {
            None
        } else {
            raw.line.as_ref().and_then(|l| {
                let product = TransportProduct::parse(l.product.as_deref()?).ok()?;
                let name = clean_line_name(l.name.as_deref().unwrap_or_default());
                Some(Line::new(name, product))
            })
        };

        let platform = raw
            .departure_platform
            .as_deref()
            .or(raw.planned_departure_platform.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Leg {
            departure,
            arrival,
            line,
            platform,
            delay_secs: raw.departure_delay,
            direction: self.clean_text(raw.direction.as_deref()),
            destination: self.clean_text(raw.destination.as_ref().and_then(|d| d.name.as_deref())),
            walking,
        })
    }

    fn clean_text(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.cleaner.clean(t)).filter(|t| !t.is_empty())
    }
}

/// Realtime time if present, else planned.
fn leg_time(
    index: usize,
    field: &'static str,
    actual: Option<&str>,
    planned: Option<&str>,
) -> Result<DateTime<FixedOffset>, ConversionError> {
    let value = actual
        .or(planned)
        .ok_or(ConversionError::MissingTime { index, field })?;

    DateTime::parse_from_rfc3339(value).map_err(|_| ConversionError::InvalidTime {
        index,
        value: value.to_string(),
    })
}

/// Normalize with the default policy and text cleanup.
pub fn normalize(raw: &[RawJourney], admissible: &ProductSet) -> Vec<Journey> {
    Normalizer::new(admissible.clone()).normalize(raw)
}
