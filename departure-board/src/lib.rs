//! Departure board server.
//!
//! Shows the next departures between a small fixed set of Berlin stations.
//! Journeys come from the transport.rest HAFAS API; they are filtered to
//! admissible products, enriched with arrival times at intermediate stops,
//! and the last good board is kept for when the API is unreachable.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod hafas;
pub mod pipeline;
pub mod retry;
pub mod web;
