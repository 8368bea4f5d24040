//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::ShortenService;
use crate::domain::repositories::{CounterRepository, MappingRepository};

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    /// Kept next to the service for health probes.
    pub mapping_store: Arc<dyn MappingRepository>,
    pub counter_store: Arc<dyn CounterRepository>,
    /// `None` when the server runs unsupervised in a single process.
    pub worker_id: Option<usize>,
    /// Bound applied to health probes, same as every other store call.
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(
        shorten_service: Arc<ShortenService>,
        mapping_store: Arc<dyn MappingRepository>,
        counter_store: Arc<dyn CounterRepository>,
        worker_id: Option<usize>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            shorten_service,
            mapping_store,
            counter_store,
            worker_id,
            store_timeout,
        }
    }
}
