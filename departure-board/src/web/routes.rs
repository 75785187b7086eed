//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::pipeline::RefreshError;

use super::dto::*;
use super::state::AppState;

/// Largest `limit` a client may ask for.
const MAX_LIMIT: usize = 50;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(list_routes))
        .route("/api/board/:route", get(board))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List the routes of the catalog.
async fn list_routes(State(state): State<AppState>) -> Json<RoutesResponse> {
    let routes = state
        .catalog
        .routes()
        .iter()
        .map(RouteView::from_route)
        .collect();

    Json(RoutesResponse { routes })
}

/// Refresh and return the board of a route.
async fn board(
    State(state): State<AppState>,
    Path(route_key): Path<String>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let route = state
        .catalog
        .route(&route_key)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown route: {route_key}"),
        })?;

    let mut config = state.settings.for_route(route, &state.catalog);
    if let Some(limit) = query.limit.as_deref() {
        config = config.with_limit(parse_limit(limit)?);
    }

    let snapshot = state.refresh.refresh(&config).await?;

    Ok(Json(BoardResponse::from_snapshot(&snapshot)))
}

fn parse_limit(s: &str) -> Result<usize, AppError> {
    match s.trim().parse::<usize>() {
        Ok(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
        _ => Err(AppError::BadRequest {
            message: format!("Invalid limit: {s} (expected 1 to {MAX_LIMIT})"),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
}

impl From<RefreshError> for AppError {
    fn from(e: RefreshError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
