//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Each successful lookup counts one click, atomically with the lookup.
/// The response is `301 Moved Permanently`; mappings never change once
/// created, so clients and proxies may cache it.
///
/// # Errors
///
/// - 400 `invalid_code` if the code is not base62
/// - 404 `not_found` if no mapping has this code
/// - 500 when the store fails
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.shorten_service.redirect(&code).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, original_url)],
    ))
}
