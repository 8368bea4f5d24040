//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{MappingResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or returns the existing) short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/url/shorten`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": 62,
///   "originalUrl": "https://example.com/some/long/path",
///   "shortUrl": "http://localhost:5000/10",
///   "code": "10",
///   "clicks": 0,
///   "createdAt": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// Submitting a URL that is already mapped returns the existing mapping
/// unchanged, with the same status.
///
/// # Errors
///
/// - 400 `invalid_url` for a malformed body or an unacceptable URL
/// - 500 when the store fails
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<MappingResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::invalid_url(
            "Request body must be JSON with an 'originalUrl' string",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let mapping = state.shorten_service.shorten(&payload.original_url).await?;

    Ok(Json(mapping.into()))
}
