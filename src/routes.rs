//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`            - Short link redirect
//! - `GET  /health`            - Store health probes
//! - `POST /api/url/shorten`   - Shorten a URL
//! - `GET  /api/url/{code}`    - Mapping details
//!
//! Trailing slashes are trimmed by the server before routing (see
//! [`crate::server`]).

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let worker_id = state.worker_id;

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer(worker_id))
}
