//! Domain layer containing business entities and store contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Both shared resources of the service, the sequence counter and the
//! mapping set, live behind these traits and never in worker memory.

pub mod entities;
pub mod repositories;
