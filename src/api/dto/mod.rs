//! Data Transfer Objects for API requests and responses.
//!
//! Field names on the wire are camelCase; validation uses `validator`.

pub mod health;
pub mod shorten;
