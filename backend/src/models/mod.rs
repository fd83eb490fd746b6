//! Database models for the Smart Agriculture Monitoring Platform
//!
//! Re-exports the domain models from the shared crate; persistence row types
//! live next to the service that owns them.

pub use shared::models::*;
