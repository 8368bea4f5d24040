//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the operations HTTP
//! handlers call.
//!
//! # Available Services
//!
//! - [`services::allocator::Allocator`] - Store-backed unique sequence numbers
//! - [`services::shorten_service::ShortenService`] - Shortening and redirect resolution

pub mod services;
