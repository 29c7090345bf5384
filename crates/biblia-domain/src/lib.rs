//! Domain types shared across Biblia services.
//!
//! This crate contains only pure types and validation rules with no framework
//! dependencies. Service crates use them at every layer, from request parsing
//! to row decoding.

pub mod error;
pub mod id;
pub mod record;
pub mod user;

pub use error::ValidationError;
