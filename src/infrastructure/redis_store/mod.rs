//! Redis-backed store components.
//!
//! Redis `INCR` is atomic and creates a missing key at zero before
//! incrementing, which is exactly the allocator's contract.

mod redis_counter;

pub use redis_counter::RedisCounterRepository;
