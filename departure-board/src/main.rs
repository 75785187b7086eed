use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use departure_board::cache::{ConnectionStore, DiskStore, MemoryStore};
use departure_board::catalog::berlin_catalog;
use departure_board::config::AppConfig;
use departure_board::hafas::{FixtureSource, HafasClient};
use departure_board::pipeline::{JourneySource, RefreshService};
use departure_board::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("departure_board=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let source: Arc<dyn JourneySource> = match &config.fixtures_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving recorded journeys");
            Arc::new(FixtureSource::new(dir)?)
        }
        None => {
            info!(url = %config.hafas.base_url, "using live journey API");
            Arc::new(HafasClient::new(config.hafas.clone())?)
        }
    };

    let store: Arc<dyn ConnectionStore> = match &config.cache_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "saving boards to disk");
            Arc::new(DiskStore::new(dir, &config.cache))
        }
        None => Arc::new(MemoryStore::new(&config.cache)),
    };

    let catalog = berlin_catalog();
    info!(
        stations = catalog.station_count(),
        routes = catalog.routes().len(),
        "loaded transport catalog"
    );

    let state = AppState::new(
        catalog,
        RefreshService::new(source, store),
        config.refresh,
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("departure board listening on http://{}", config.listen_addr);
    info!("  GET /health");
    info!("  GET /api/routes");
    info!("  GET /api/board/:route?limit=N");

    axum::serve(listener, app).await?;
    Ok(())
}
