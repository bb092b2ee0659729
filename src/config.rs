use std::path::PathBuf;

use crate::{
    data::{FractionLevel, Topology, UnderflowPolicy},
    error::{Result, WorkloadError},
};

/// File name of the per-run summary written next to the range files.
pub const MANIFEST_FILE_NAME: &str = "manifest.csv";

/// Golden-ratio constant used to spread fraction levels across seed space.
const LEVEL_SEED_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Parameters of one driver run.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    pub dataset_size: usize,
    pub queries: usize,
    pub output_dir: PathBuf,
    pub topology: Topology,
    pub seed: u64,
    pub underflow: UnderflowPolicy,
    pub parallel: bool,
    pub threads: usize,
}

impl WorkloadConfig {
    pub fn new(
        dataset_size: usize,
        queries: usize,
        output_dir: impl Into<PathBuf>,
        topology: Topology,
        seed: u64,
    ) -> Self {
        WorkloadConfig {
            dataset_size,
            queries,
            output_dir: output_dir.into(),
            topology,
            seed,
            underflow: UnderflowPolicy::Fail,
            parallel: false,
            threads: num_cpus::get(),
        }
    }

    pub fn with_underflow(mut self, underflow: UnderflowPolicy) -> Self {
        self.underflow = underflow;
        self
    }

    /// Generates levels on a rayon pool of `threads` workers.
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallel = true;
        self.threads = threads;
        self
    }

    /// Applies the command-line parallelism flags. An explicit thread count
    /// implies parallel generation.
    pub fn with_parallel_options(self, parallel: bool, threads: Option<usize>) -> Self {
        match (parallel, threads) {
            (_, Some(threads)) => self.with_parallelism(threads),
            (true, None) => self.with_parallelism(num_cpus::get()),
            (false, None) => self,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset_size == 0 {
            return Err(WorkloadError::InvalidArgument(
                "number of points must be positive".to_string(),
            ));
        }
        if self.dataset_size > u32::MAX as usize {
            return Err(WorkloadError::InvalidArgument(format!(
                "number of points {} exceeds {}",
                self.dataset_size,
                u32::MAX
            )));
        }
        if self.parallel && self.threads == 0 {
            return Err(WorkloadError::InvalidArgument(
                "thread count must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Seed for one level's random source.
    ///
    /// Every level gets its own stream so the output does not depend on the
    /// order levels are generated in. The level is spread by a 64-bit odd
    /// multiplier before mixing, so level `f + 1` under seed `s` never equals
    /// level `f` under a nearby seed.
    pub fn level_seed(&self, level: FractionLevel) -> u64 {
        self.seed ^ (level.value() as u64).wrapping_mul(LEVEL_SEED_MULTIPLIER)
    }

    pub fn level_path(&self, level: FractionLevel) -> PathBuf {
        self.output_dir.join(level.file_name())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_validate() {
        let config = WorkloadConfig::new(1000, 10, "out", Topology::Closed, 42);
        assert!(config.validate().is_ok());

        let config = WorkloadConfig::new(0, 10, "out", Topology::Closed, 42);
        assert!(matches!(
            config.validate(),
            Err(WorkloadError::InvalidArgument(_))
        ));

        let config =
            WorkloadConfig::new(1000, 10, "out", Topology::Closed, 42).with_parallelism(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_level_paths_and_seeds() {
        let config = WorkloadConfig::new(1000, 10, "out/ranges", Topology::Open, u64::MAX);
        let level = FractionLevel::new(3).unwrap();

        assert_eq!(config.level_path(level), PathBuf::from("out/ranges/3.bin"));
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("out/ranges/manifest.csv")
        );
        assert_eq!(
            config.level_seed(level),
            u64::MAX ^ 3u64.wrapping_mul(LEVEL_SEED_MULTIPLIER)
        );
        assert_eq!(config.level_seed(FractionLevel::new(0).unwrap()), u64::MAX);
    }

    #[test]
    fn test_level_seeds_do_not_collide_across_nearby_seeds() {
        let mut seen = HashSet::new();
        for seed in 0..256u64 {
            let config = WorkloadConfig::new(1000, 10, "out", Topology::Closed, seed);
            for level in FractionLevel::all() {
                assert!(seen.insert(config.level_seed(level)));
            }
        }
    }

    #[test]
    fn test_parallel_options() {
        let base = WorkloadConfig::new(1000, 10, "out", Topology::Closed, 42);

        let config = base.clone().with_parallel_options(false, None);
        assert!(!config.parallel);

        let config = base.clone().with_parallel_options(false, Some(3));
        assert!(config.parallel);
        assert_eq!(config.threads, 3);

        let config = base.with_parallel_options(true, None);
        assert!(config.parallel);
        assert_eq!(config.threads, num_cpus::get());
    }
}
