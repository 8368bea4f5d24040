//! URL shortening and redirect resolution.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::allocator::Allocator;
use crate::application::services::deadline::with_store_timeout;
use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{InsertOutcome, MappingRepository};
use crate::error::AppError;
use crate::utils::base62;
use crate::utils::url_normalizer::normalize_url;

/// Service for creating mappings and resolving short codes.
///
/// Holds no mutable state of its own: the counter and the mapping set live
/// in the store, so any number of instances can serve the same data.
pub struct ShortenService {
    mappings: Arc<dyn MappingRepository>,
    allocator: Allocator,
    base_url: String,
    store_timeout: Duration,
}

impl ShortenService {
    /// Creates a new shorten service.
    ///
    /// `base_url` is the public address short codes are appended to.
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        allocator: Allocator,
        base_url: impl Into<String>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            mappings,
            allocator,
            base_url: base_url.into(),
            store_timeout,
        }
    }

    /// Returns the mapping for `raw_url`, creating it on first submission.
    ///
    /// # Deduplication
    ///
    /// An existing mapping for the same trimmed URL is returned unchanged and
    /// no sequence number is allocated. When two first submissions of one URL
    /// race, the store's uniqueness constraint picks a winner and the loser
    /// returns the winner's mapping; its own allocated id is left unused.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] before any store access if the URL is
    /// not an absolute http(s) URL.
    /// Returns [`AppError::StoreUnavailable`] or [`AppError::StoreWriteFailed`]
    /// on store failures.
    pub async fn shorten(&self, raw_url: &str) -> Result<Mapping, AppError> {
        let original_url = normalize_url(raw_url)
            .map_err(|e| AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() })))?;

        if let Some(existing) = self.find_by_original_url(&original_url).await? {
            debug!(code = %existing.code, "URL already shortened");
            metrics::counter!("seqlink_shorten_total", "outcome" => "existing").increment(1);
            return Ok(existing);
        }

        let id = self.allocator.next_id().await?;
        let new_mapping = NewMapping::allocate(id, original_url, &self.base_url);

        let outcome = with_store_timeout(
            self.store_timeout,
            "mapping.insert",
            self.mappings.insert(new_mapping.clone()),
        )
        .await?;

        match outcome {
            InsertOutcome::Created(mapping) => {
                info!(id = mapping.id, code = %mapping.code, "Created short link");
                metrics::counter!("seqlink_shorten_total", "outcome" => "created").increment(1);
                Ok(mapping)
            }
            InsertOutcome::OriginalUrlTaken => {
                warn!(
                    unused_id = id,
                    "Concurrent shorten of the same URL, returning existing mapping"
                );
                metrics::counter!("seqlink_shorten_total", "outcome" => "raced").increment(1);

                self.find_by_original_url(&new_mapping.original_url)
                    .await?
                    .ok_or_else(|| {
                        AppError::store_write_failed(
                            "Mapping reported as existing but not found",
                            json!({ "unused_id": id }),
                        )
                    })
            }
        }
    }

    /// Resolves a short code and counts the visit.
    ///
    /// The click increment and the lookup are one store operation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] without touching the store if `code`
    /// is not alphanumeric.
    /// Returns [`AppError::NotFound`] if no mapping has this code. Codes that
    /// no sequence number encodes to (too long, or a leading zero) are not
    /// looked up.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn redirect(&self, code: &str) -> Result<String, AppError> {
        if !base62::is_valid_code(code) {
            metrics::counter!("seqlink_redirect_total", "outcome" => "invalid").increment(1);
            return Err(AppError::invalid_code(
                "Invalid short code format",
                json!({ "code": code }),
            ));
        }
        if base62::decode(code).is_none() {
            metrics::counter!("seqlink_redirect_total", "outcome" => "not_found").increment(1);
            return Err(unknown_code(code));
        }

        let mapping = with_store_timeout(
            self.store_timeout,
            "mapping.find_and_increment_clicks",
            self.mappings.find_and_increment_clicks(code),
        )
        .await?;

        match mapping {
            Some(mapping) => {
                debug!(code, clicks = mapping.clicks, "Redirect");
                metrics::counter!("seqlink_redirect_total", "outcome" => "found").increment(1);
                Ok(mapping.original_url)
            }
            None => {
                metrics::counter!("seqlink_redirect_total", "outcome" => "not_found").increment(1);
                Err(unknown_code(code))
            }
        }
    }

    /// Looks up a mapping by code without counting a visit.
    ///
    /// # Errors
    ///
    /// Same as [`Self::redirect`].
    pub async fn get_mapping(&self, code: &str) -> Result<Mapping, AppError> {
        if !base62::is_valid_code(code) {
            return Err(AppError::invalid_code(
                "Invalid short code format",
                json!({ "code": code }),
            ));
        }
        if base62::decode(code).is_none() {
            return Err(unknown_code(code));
        }

        with_store_timeout(
            self.store_timeout,
            "mapping.find_by_code",
            self.mappings.find_by_code(code),
        )
        .await?
        .ok_or_else(|| unknown_code(code))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Mapping>, AppError> {
        with_store_timeout(
            self.store_timeout,
            "mapping.find_by_original_url",
            self.mappings.find_by_original_url(original_url),
        )
        .await
    }
}

fn unknown_code(code: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "code": code }))
}
