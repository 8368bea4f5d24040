#![allow(dead_code)]

use axum_test::TestServer;
use seqlink::application::services::{Allocator, ShortenService};
use seqlink::domain::repositories::{CounterRepository, MappingRepository};
use seqlink::infrastructure::memory::{MemoryCounterRepository, MemoryMappingRepository};
use seqlink::routes::app_router;
use seqlink::state::AppState;
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "http://localhost:5000";
pub const COUNTER_NAME: &str = "url_id";

pub struct TestApp {
    pub server: TestServer,
    pub counters: Arc<MemoryCounterRepository>,
    pub mappings: Arc<MemoryMappingRepository>,
}

pub fn create_test_state(
    mappings: Arc<dyn MappingRepository>,
    counters: Arc<dyn CounterRepository>,
) -> AppState {
    create_test_state_with_timeout(mappings, counters, Duration::from_secs(5))
}

pub fn create_test_state_with_timeout(
    mappings: Arc<dyn MappingRepository>,
    counters: Arc<dyn CounterRepository>,
    timeout: Duration,
) -> AppState {
    let allocator = Allocator::new(counters.clone(), COUNTER_NAME, timeout);
    let shorten_service = Arc::new(ShortenService::new(
        mappings.clone(),
        allocator,
        BASE_URL,
        timeout,
    ));

    AppState::new(shorten_service, mappings, counters, Some(0), timeout)
}

/// Full router over fresh in-memory stores.
pub fn create_test_app() -> TestApp {
    let counters = Arc::new(MemoryCounterRepository::new());
    let mappings = Arc::new(MemoryMappingRepository::new());
    let state = create_test_state(mappings.clone(), counters.clone());

    let server = TestServer::new(app_router(state)).unwrap();

    TestApp {
        server,
        counters,
        mappings,
    }
}
