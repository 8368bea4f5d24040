//! Bounded waiting on store calls.

use std::future::Future;
use std::time::Duration;

use serde_json::json;

use crate::error::AppError;

/// Awaits a store operation for at most `limit`.
///
/// An elapsed deadline is reported as [`AppError::StoreUnavailable`]. The
/// operation itself may still complete on the store side; callers never retry.
pub async fn with_store_timeout<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::store_unavailable(
            "Store operation timed out",
            json!({ "operation": operation, "timeout_ms": limit.as_millis() as u64 }),
        )),
    }
}
