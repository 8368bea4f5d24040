//! HTTP request handlers.
//!
//! Handlers translate between HTTP and [`crate::application::services::ShortenService`];
//! they hold no business logic of their own.

pub mod health;
pub mod mapping;
pub mod redirect;
pub mod shorten;

pub use health::health_handler;
pub use mapping::mapping_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
