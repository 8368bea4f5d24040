//! Handler for mapping lookup.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::shorten::MappingResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the mapping behind a short code, including its click count.
///
/// # Endpoint
///
/// `GET /api/url/{code}`
///
/// Unlike `GET /{code}`, this does not count as a click.
///
/// # Errors
///
/// - 400 `invalid_code` if the code is not base62
/// - 404 `not_found` if no mapping has this code
pub async fn mapping_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MappingResponse>, AppError> {
    let mapping = state.shorten_service.get_mapping(&code).await?;

    Ok(Json(mapping.into()))
}
