//! Sequence number allocation.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::services::deadline::with_store_timeout;
use crate::domain::repositories::CounterRepository;
use crate::error::AppError;

/// Hands out strictly increasing sequence numbers shared by all workers.
///
/// Every call is one atomic increment-and-fetch in the counter store. The
/// allocator keeps no local copy of the counter, so any number of workers
/// can allocate concurrently without coordinating with each other.
pub struct Allocator {
    counters: Arc<dyn CounterRepository>,
    counter_name: String,
    store_timeout: Duration,
}

impl Allocator {
    /// Creates an allocator over the counter `counter_name`.
    pub fn new(
        counters: Arc<dyn CounterRepository>,
        counter_name: impl Into<String>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            counters,
            counter_name: counter_name.into(),
            store_timeout,
        }
    }

    /// Allocates the next sequence number.
    ///
    /// The first allocation against a fresh counter returns `1`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the counter store fails or
    /// does not answer within the store timeout.
    pub async fn next_id(&self) -> Result<u64, AppError> {
        let id = with_store_timeout(
            self.store_timeout,
            "counter.increment",
            self.counters.increment_and_fetch(&self.counter_name),
        )
        .await?;

        metrics::counter!("seqlink_allocations_total").increment(1);
        debug!(counter = %self.counter_name, id, "Allocated sequence id");

        Ok(id)
    }
}
