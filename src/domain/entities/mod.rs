//! Core domain entities.
//!
//! - [`Mapping`] - A long URL, its sequence number, short code, and click count
//! - [`NewMapping`] - Input for creating a mapping

pub mod mapping;

pub use mapping::{Mapping, NewMapping};
