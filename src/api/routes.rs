//! API route configuration.

use crate::api::handlers::{mapping_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /url/shorten` - Create or fetch the short link for a URL
/// - `GET  /url/{code}`   - Mapping details without counting a click
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/url/shorten", post(shorten_handler))
        .route("/url/{code}", get(mapping_handler))
}
