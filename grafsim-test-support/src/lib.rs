//! Shared test utilities used across grafsim crates.

pub mod fixtures;
pub mod tracing;
