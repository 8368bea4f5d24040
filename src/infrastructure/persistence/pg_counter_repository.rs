//! PostgreSQL implementation of the counter repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::CounterRepository;
use crate::error::AppError;

/// PostgreSQL repository for named sequence counters.
///
/// Each counter is one row in `counters`. Creation and increment happen in a
/// single upsert statement, so concurrent first allocations cannot race.
pub struct PgCounterRepository {
    pool: Arc<PgPool>,
}

impl PgCounterRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Reads the current value of a counter without incrementing it.
    ///
    /// Returns `Ok(None)` if the counter has never been used.
    pub async fn current(&self, name: &str) -> Result<Option<u64>, AppError> {
        let seq: Option<i64> = sqlx::query_scalar("SELECT seq FROM counters WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        seq.map(|value| to_sequence(name, value)).transpose()
    }
}

#[async_trait]
impl CounterRepository for PgCounterRepository {
    async fn increment_and_fetch(&self, name: &str) -> Result<u64, AppError> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (name, seq)
            VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET seq = counters.seq + 1
            RETURNING seq
            "#,
        )
        .bind(name)
        .fetch_one(self.pool.as_ref())
        .await?;

        to_sequence(name, seq)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

fn to_sequence(name: &str, value: i64) -> Result<u64, AppError> {
    u64::try_from(value).map_err(|_| {
        AppError::store_unavailable(
            "Counter holds a negative value",
            json!({ "counter": name, "value": value }),
        )
    })
}
