//! Benchmark support crate for grafsim.
//!
//! Provides seeded sample graphs and parameter types used by the Criterion
//! benchmarks for graph generation, metric evaluation and full simulations.

pub mod error;
pub mod params;
pub mod sample;
