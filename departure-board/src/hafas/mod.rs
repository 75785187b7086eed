//! transport.rest (HAFAS) journey API.
//!
//! Key characteristics of the API:
//! - Times are ISO 8601 strings with a UTC offset; realtime fields are
//!   absent when no live data exists, planned fields are always sent
//! - A success status does not guarantee a usable body: the `journeys`
//!   array is occasionally missing, so both cases are retried. Single
//!   journeys that fail to decode are dropped without failing the query
//! - Names carry decoration ("S+U ... Bhf (Berlin)") that is cleaned
//!   before display

mod client;
mod convert;
mod error;
mod mock;
mod text;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_RESULTS, HafasClient, HafasConfig};
pub use convert::{AdmissionPolicy, ConversionError, Normalizer, normalize};
pub use error::HafasError;
pub use mock::FixtureSource;
pub use text::{BERLIN_BOILERPLATE, TextCleaner, clean_line_name};
pub use types::{RawJourney, RawJourneysResponse, RawLeg, RawLine, RawStop};
