//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::TransportCatalog;
use crate::pipeline::{RefreshService, RefreshSettings};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Stations and routes that can be shown
    pub catalog: Arc<TransportCatalog>,

    /// Pipeline with last-good fallback
    pub refresh: RefreshService,

    /// Refresh settings applied to every route
    pub settings: RefreshSettings,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        catalog: TransportCatalog,
        refresh: RefreshService,
        settings: RefreshSettings,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            refresh,
            settings,
        }
    }
}
