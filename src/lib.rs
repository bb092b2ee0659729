//! Synthetic range-filter workloads for range-filtered ANN benchmarks.
//!
//! Given a dataset of `N` points, the generator draws `Q` query ranges over
//! `[0, N)` at a controlled selectivity and writes them as little-endian
//! `(L, R)` pairs, one file per fraction level.

pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod report;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

pub use config::WorkloadConfig;
pub use data::{
    generator::{generate, RangeGenerator},
    range_file::{decode, encode, read_range_file, write_range_file},
    FractionLevel, QueryRange, Topology, UnderflowPolicy,
};
pub use error::{Result, WorkloadError};
