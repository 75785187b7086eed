//! Station identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// An opaque station identifier understood by the journey API.
///
/// HAFAS ids are usually numeric strings (`900100003` for Berlin
/// Alexanderplatz), but other profiles use IFOPT ids such as
/// `de:11000:900100003`. The id is passed through as-is; the only
/// requirement is that it is non-empty with no whitespace or control
/// characters.
///
/// # Examples
///
/// ```
/// use departure_board::domain::StationId;
///
/// let alex = StationId::parse("900100003").unwrap();
/// assert_eq!(alex.as_str(), "900100003");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("9001 0003").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Parse a station id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidStationId {
                reason: "must not contain whitespace or control characters",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = InvalidStationId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
