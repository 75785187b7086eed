//! JSON HTTP surface for the departure board front end.
//!
//! - `GET /health`
//! - `GET /api/routes`
//! - `GET /api/board/:route?limit=N`

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
