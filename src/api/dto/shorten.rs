//! DTOs for the shorten endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Mapping;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// Candidate long URL; normalized and checked by the service.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,
}

/// Mapping as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResponse {
    pub id: u64,
    pub original_url: String,
    pub short_url: String,
    pub code: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Mapping> for MappingResponse {
    fn from(mapping: Mapping) -> Self {
        Self {
            id: mapping.id,
            original_url: mapping.original_url,
            short_url: mapping.short_url,
            code: mapping.code,
            clicks: mapping.clicks,
            created_at: mapping.created_at,
        }
    }
}
