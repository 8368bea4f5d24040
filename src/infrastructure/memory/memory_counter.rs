use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;

use crate::domain::repositories::CounterRepository;
use crate::error::AppError;

/// In-memory named counters.
///
/// The increment runs under the shard write lock of the counter's entry,
/// so concurrent callers always observe distinct values.
#[derive(Debug, Default)]
pub struct MemoryCounterRepository {
    counters: DashMap<String, u64>,
}

impl MemoryCounterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter, `0` if it was never incremented.
    pub fn current(&self, name: &str) -> u64 {
        self.counters.get(name).map(|v| *v).unwrap_or(0)
    }
}

#[async_trait]
impl CounterRepository for MemoryCounterRepository {
    async fn increment_and_fetch(&self, name: &str) -> Result<u64, AppError> {
        let mut value = self.counters.entry(name.to_string()).or_insert(0);

        let next = value.checked_add(1).ok_or_else(|| {
            AppError::store_write_failed("Counter exhausted", json!({ "counter": name }))
        })?;
        *value = next;

        Ok(next)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
