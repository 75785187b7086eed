//! Fixture-backed journey source for development without network access.
//!
//! Serves recorded `/journeys` responses from JSON files, as if they were
//! live API answers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ProductSet, StationId};
use crate::pipeline::JourneySource;

use super::error::HafasError;
use super::types::{RawJourney, RawJourneysResponse};

/// Journey source that reads recorded responses from a directory.
///
/// Expects files named `{origin}_{destination}.json` (e.g.
/// `900100003_900023201.json`) holding a `/journeys` response body.
/// Files are read on every query, so fixtures can be edited while the
/// server runs.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    /// Create a source reading from `dir`.
    ///
    /// Fails if `dir` is not a directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, HafasError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(HafasError::Fixture(format!(
                "fixture directory {} does not exist",
                dir.display()
            )));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, origin: &StationId, destination: &StationId) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.json",
            file_stem(origin),
            file_stem(destination)
        ))
    }

    /// Load the recorded journeys for a station pair.
    pub fn load(
        &self,
        origin: &StationId,
        destination: &StationId,
    ) -> Result<Vec<RawJourney>, HafasError> {
        let path = self.path_for(origin, destination);

        let json = std::fs::read_to_string(&path).map_err(|e| {
            HafasError::Fixture(format!("failed to read {}: {e}", path.display()))
        })?;

        let response: RawJourneysResponse = serde_json::from_str(&json).map_err(|e| {
            HafasError::Fixture(format!("failed to parse {}: {e}", path.display()))
        })?;

        let journeys = response.into_journeys().unwrap_or_default();
        debug!(path = %path.display(), count = journeys.len(), "loaded fixture journeys");
        Ok(journeys)
    }
}

/// Station id as a file name part: anything but ASCII letters, digits and
/// `-` becomes `-`, so `de:11000:900100003` maps to `de-11000-900100003`.
fn file_stem(id: &StationId) -> String {
    id.as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}

#[async_trait]
impl JourneySource for FixtureSource {
    /// Products and attempt count are ignored; fixtures are static.
    async fn journeys(
        &self,
        origin: &StationId,
        destination: &StationId,
        _products: &ProductSet,
        _max_attempts: u32,
    ) -> Result<Vec<RawJourney>, HafasError> {
        self.load(origin, destination)
    }
}
