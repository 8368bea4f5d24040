//! Repository trait for durable sequence counters.

use crate::error::AppError;
use async_trait::async_trait;

/// Durable named counters with atomic increment.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCounterRepository`] - `INSERT … ON CONFLICT` upsert
/// - [`crate::infrastructure::redis_store::RedisCounterRepository`] - Redis `INCR`
/// - [`crate::infrastructure::memory::MemoryCounterRepository`] - single-process backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Atomically increments the counter `name` and returns the new value.
    ///
    /// A counter that does not exist yet is created as part of the same
    /// operation, so the first call returns `1`. Two callers never observe
    /// the same value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be reached.
    async fn increment_and_fetch(&self, name: &str) -> Result<u64, AppError>;

    /// Checks if the counter backend is reachable.
    async fn health_check(&self) -> bool;
}
