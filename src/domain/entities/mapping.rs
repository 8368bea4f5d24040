//! Mapping entity: one record per distinct long URL.

use chrono::{DateTime, Utc};

use crate::utils::base62;

/// A long URL and the short code allocated for it.
///
/// `code` is always `base62::encode(id)`. Only `clicks` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: u64,
    pub original_url: String,
    pub code: String,
    pub short_url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Returns true if the stored code matches the code derived from `id`.
    pub fn is_consistent(&self) -> bool {
        base62::encode(self.id) == self.code
    }
}

/// Input data for creating a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub id: u64,
    pub original_url: String,
    pub code: String,
    pub short_url: String,
}

impl NewMapping {
    /// Builds a mapping for a freshly allocated sequence number.
    ///
    /// `base_url` may carry a trailing slash; it is stripped before the code is appended.
    pub fn allocate(id: u64, original_url: String, base_url: &str) -> Self {
        let code = base62::encode(id);
        let short_url = compose_short_url(base_url, &code);
        Self {
            id,
            original_url,
            code,
            short_url,
        }
    }

    /// Turns the input into a stored record with zero clicks.
    pub fn into_mapping(self, created_at: DateTime<Utc>) -> Mapping {
        Mapping {
            id: self.id,
            original_url: self.original_url,
            code: self.code,
            short_url: self.short_url,
            clicks: 0,
            created_at,
        }
    }
}

/// Joins the public base address and a short code.
pub fn compose_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
