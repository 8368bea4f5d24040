//! Business logic services for the application layer.

pub mod allocator;
pub mod deadline;
pub mod shorten_service;

pub use allocator::Allocator;
pub use shorten_service::ShortenService;
