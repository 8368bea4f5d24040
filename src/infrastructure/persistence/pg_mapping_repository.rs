//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{InsertOutcome, MappingRepository};
use crate::error::AppError;
use crate::utils::db_error::{is_unique_violation_on_original_url, unique_violation_constraint};

#[derive(Debug, sqlx::FromRow)]
struct MappingRow {
    id: i64,
    original_url: String,
    code: String,
    short_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<MappingRow> for Mapping {
    type Error = AppError;

    fn try_from(row: MappingRow) -> Result<Self, Self::Error> {
        let out_of_range = || {
            AppError::store_unavailable(
                "Mapping row holds a negative value",
                json!({ "id": row.id, "clicks": row.clicks }),
            )
        };

        Ok(Mapping {
            id: u64::try_from(row.id).map_err(|_| out_of_range())?,
            clicks: u64::try_from(row.clicks).map_err(|_| out_of_range())?,
            original_url: row.original_url,
            code: row.code,
            short_url: row.short_url,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL repository for mapping storage and retrieval.
///
/// Uniqueness of `original_url` and `code` is enforced by table constraints;
/// click increments run as a single `UPDATE … RETURNING`.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Counts all stored mappings.
    pub async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Lists the most clicked mappings, most clicked first.
    pub async fn top_by_clicks(&self, limit: i64) -> Result<Vec<Mapping>, AppError> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, original_url, code, short_url, clicks, created_at
            FROM mappings
            ORDER BY clicks DESC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Mapping::try_from).collect()
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError> {
        let id = i64::try_from(new_mapping.id).map_err(|_| {
            AppError::store_write_failed(
                "Sequence id exceeds storage range",
                json!({ "id": new_mapping.id }),
            )
        })?;

        let result = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO mappings (id, original_url, code, short_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, original_url, code, short_url, clicks, created_at
            "#,
        )
        .bind(id)
        .bind(&new_mapping.original_url)
        .bind(&new_mapping.code)
        .bind(&new_mapping.short_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Created(row.try_into()?)),
            Err(e) if is_unique_violation_on_original_url(&e) => {
                Ok(InsertOutcome::OriginalUrlTaken)
            }
            Err(e) if e.as_database_error().is_some() => Err(AppError::store_write_failed(
                "Failed to persist mapping",
                json!({
                    "id": new_mapping.id,
                    "code": new_mapping.code,
                    "constraint": unique_violation_constraint(&e),
                    "reason": e.to_string(),
                }),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, original_url, code, short_url, clicks, created_at
            FROM mappings
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Mapping::try_from).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, original_url, code, short_url, clicks, created_at
            FROM mappings
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Mapping::try_from).transpose()
    }

    async fn find_and_increment_clicks(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            UPDATE mappings
            SET clicks = clicks + 1
            WHERE code = $1
            RETURNING id, original_url, code, short_url, clicks, created_at
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Mapping::try_from).transpose()
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
