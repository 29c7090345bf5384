//! Shared HTTP plumbing for Biblia services.

pub mod config;
pub mod envelope;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
