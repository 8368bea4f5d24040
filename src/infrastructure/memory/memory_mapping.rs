use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{InsertOutcome, MappingRepository};
use crate::error::AppError;

/// In-memory mapping store with both unique indexes.
///
/// Records are keyed by code; a second map indexes codes by original URL.
/// Inserts take the URL entry before the code entry and publish the URL index
/// last, so a reader that finds a URL always finds its record.
#[derive(Debug, Default)]
pub struct MemoryMappingRepository {
    by_code: DashMap<String, Mapping>,
    code_by_url: DashMap<String, String>,
}

impl MemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[async_trait]
impl MappingRepository for MemoryMappingRepository {
    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError> {
        let url_slot = match self.code_by_url.entry(new_mapping.original_url.clone()) {
            Entry::Occupied(_) => return Ok(InsertOutcome::OriginalUrlTaken),
            Entry::Vacant(slot) => slot,
        };

        let code_slot = match self.by_code.entry(new_mapping.code.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::store_write_failed(
                    "Short code already exists",
                    json!({ "id": new_mapping.id, "code": new_mapping.code }),
                ));
            }
            Entry::Vacant(slot) => slot,
        };

        let mapping = new_mapping.into_mapping(Utc::now());
        code_slot.insert(mapping.clone());
        url_slot.insert(mapping.code.clone());

        Ok(InsertOutcome::Created(mapping))
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<Mapping>, AppError> {
        let Some(code) = self.code_by_url.get(original_url).map(|c| c.clone()) else {
            return Ok(None);
        };

        Ok(self.by_code.get(&code).map(|m| m.clone()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        Ok(self.by_code.get(code).map(|m| m.clone()))
    }

    async fn find_and_increment_clicks(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let Some(mut mapping) = self.by_code.get_mut(code) else {
            return Ok(None);
        };

        mapping.clicks = mapping.clicks.saturating_add(1);
        Ok(Some(mapping.clone()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
