use std::{path::PathBuf, time::Duration};

use crate::data::{FractionLevel, QueryRange, Topology};

use metrics::SelectivityStats;

pub mod logger;
pub mod macros;
pub mod metrics;

/// Number of leading ranges kept in a report for display.
pub const SAMPLE_SIZE: usize = 5;

/// Outcome of generating and writing one fraction level.
#[derive(Debug, Clone)]
pub struct LevelReport {
    pub level: FractionLevel,
    pub topology: Topology,
    pub dataset_size: usize,
    pub queries: usize,
    pub seed: u64,
    pub path: PathBuf,
    pub file_size_bytes: u64,
    pub generation_time: Duration,
    pub stats: SelectivityStats,
    pub sample: Vec<QueryRange>,
}

impl LevelReport {
    /// Sample ranges formatted as `(l, r), (l, r), ...`.
    pub fn sample_display(&self) -> String {
        self.sample
            .iter()
            .map(|range| range.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
