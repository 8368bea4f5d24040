//! Repository trait definitions for the domain layer.
//!
//! These traits are the service's whole contract with the durable store.
//! Implementations live in `crate::infrastructure`; mocks are generated with
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`CounterRepository`] - Atomic increment-and-fetch on named counters
//! - [`MappingRepository`] - Mapping insert, lookups, and click increments
//!
//! # Testing
//!
//! See `tests/repository_*.rs` for PostgreSQL behaviour and the in-memory
//! backend tests in `crate::infrastructure::memory`.

pub mod counter_repository;
pub mod mapping_repository;

pub use counter_repository::CounterRepository;
pub use mapping_repository::{InsertOutcome, MappingRepository};

#[cfg(test)]
pub use counter_repository::MockCounterRepository;
#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
