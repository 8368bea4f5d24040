//! Utility functions for code encoding, URL validation, and store error inspection.
//!
//! - [`base62`] - Sequence number ⇄ short code encoding
//! - [`url_normalizer`] - Long URL trimming and validation
//! - [`db_error`] - Classification of PostgreSQL constraint violations

pub mod base62;
pub mod db_error;
pub mod url_normalizer;
