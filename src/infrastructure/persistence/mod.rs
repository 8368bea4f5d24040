//! PostgreSQL repository implementations.
//!
//! Atomicity of both shared resources is delegated to single SQL statements:
//! an upsert for the counter and an `UPDATE … RETURNING` for clicks.
//!
//! # Repositories
//!
//! - [`PgCounterRepository`] - Named sequence counters
//! - [`PgMappingRepository`] - Mapping storage, lookups, and click increments

pub mod pg_counter_repository;
pub mod pg_mapping_repository;

pub use pg_counter_repository::PgCounterRepository;
pub use pg_mapping_repository::PgMappingRepository;
