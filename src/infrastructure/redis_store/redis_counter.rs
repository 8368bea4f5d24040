//! Redis implementation of the counter repository.

use crate::domain::repositories::CounterRepository;
use crate::error::AppError;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::json;
use tracing::{debug, info};

/// Redis counter store for sequence allocation.
///
/// Uses `ConnectionManager` for automatic reconnection. Unlike a cache, every
/// error here propagates: an allocation must never be guessed.
pub struct RedisCounterRepository {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCounterRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis counter store");

        let client = Client::open(redis_url).map_err(|e| {
            AppError::store_unavailable(
                "Failed to create Redis client",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis counter store");

        Ok(Self {
            client: manager,
            key_prefix: "seqlink:counter:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, name: &str) -> String {
        format!("{}{}", self.key_prefix, name)
    }
}

#[async_trait]
impl CounterRepository for RedisCounterRepository {
    async fn increment_and_fetch(&self, name: &str) -> Result<u64, AppError> {
        let key = self.build_key(name);
        let mut conn = self.client.clone();

        let value: i64 = conn.incr(&key, 1).await?;
        debug!(counter = name, value, "Redis INCR");

        u64::try_from(value).map_err(|_| {
            AppError::store_unavailable(
                "Counter holds a negative value",
                json!({ "counter": name, "value": value }),
            )
        })
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
