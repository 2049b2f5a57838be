//! Shared test utilities used across randdot crates.

pub mod ci;
pub mod dot;
pub mod tracing;
