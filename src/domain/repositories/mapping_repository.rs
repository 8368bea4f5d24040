//! Repository trait for mapping data access.

use crate::domain::entities::{Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of inserting a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The mapping was stored.
    Created(Mapping),
    /// Another mapping already holds this `original_url`; nothing was written.
    OriginalUrlTaken,
}

/// Repository interface for mappings.
///
/// `original_url` and `code` are each unique across the whole set.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryMappingRepository`] - single-process backend
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping with zero clicks.
    ///
    /// A uniqueness conflict on `original_url` is reported as
    /// [`InsertOutcome::OriginalUrlTaken`] so callers can return the existing record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreWriteFailed`] if the store rejects the write for
    /// any other reason, including a duplicate `code` or `id`.
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be reached.
    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError>;

    /// Finds a mapping by exact `original_url` match.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<Mapping>, AppError>;

    /// Finds a mapping by short code without touching its click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError>;

    /// Atomically increments `clicks` of the mapping with `code` and returns it.
    ///
    /// Concurrent calls for the same code never lose an increment.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Mapping))` with the incremented count if found
    /// - `Ok(None)` if no mapping has this code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn find_and_increment_clicks(&self, code: &str) -> Result<Option<Mapping>, AppError>;

    /// Checks if the mapping store is reachable.
    async fn health_check(&self) -> bool;
}
