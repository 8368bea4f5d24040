//! In-process store backend built on `DashMap`.
//!
//! Atomicity holds only within one process, so this backend is limited to
//! single-worker deployments (enforced by configuration validation) and tests.

mod memory_counter;
mod memory_mapping;

pub use memory_counter::MemoryCounterRepository;
pub use memory_mapping::MemoryMappingRepository;
