//! The journey pipeline: fetch, normalize, correlate, select.
//!
//! `run_refresh` performs one pass for a `RefreshConfig`;
//! `RefreshService` adds the last-good fallback around it.

mod config;
mod correlate;
mod rank;
mod refresh;

pub use config::{DEFAULT_LIMIT, RefreshConfig, RefreshSettings};
pub use correlate::{correlate, enrich};
pub use rank::select;
pub use refresh::{
    Board, BoardSnapshot, Freshness, JourneySource, RefreshError, RefreshService, run_refresh,
};
