//! Infrastructure layer: concrete store backends.
//!
//! This layer implements the repository traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL counters and mappings
//! - [`redis_store`] - Redis-backed sequence counter
//! - [`memory`] - In-process backend for single-worker deployments and tests

pub mod memory;
pub mod persistence;
pub mod redis_store;
