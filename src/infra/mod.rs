//! Infrastructure adapters and runtime bootstrap.

pub mod api;
pub mod error;
pub mod lifetime;
pub mod telemetry;
