use std::fs;

use rand::{rngs::StdRng, SeedableRng};
use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPoolBuilder,
};
use tracing::{error, info, info_span};

use crate::{
    config::WorkloadConfig,
    data::{generator::RangeGenerator, range_file::write_range_file, FractionLevel},
    error::{Result, WorkloadError},
    report::{
        logger::WorkloadLogger, metrics::calculate_selectivity_stats, LevelReport, SAMPLE_SIZE,
    },
};

/// Generates one range file per fraction level and a manifest summarizing them.
///
/// A sequential run stops at the first failing level. A parallel run lets
/// every level finish and returns `WorkloadError::Levels` with all failures.
/// The manifest is written only when every level succeeded.
pub fn run(config: &WorkloadConfig) -> Result<Vec<LevelReport>> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir)
        .map_err(|source| WorkloadError::io(&config.output_dir, source))?;

    info!(
        n = config.dataset_size,
        q = config.queries,
        topology = %config.topology,
        seed = config.seed,
        parallel = config.parallel,
        output_dir = %config.output_dir.display(),
        "generating range workload"
    );

    let reports = if config.parallel {
        run_parallel(config)?
    } else {
        run_sequential(config)?
    };

    let mut logger = WorkloadLogger::new();
    for report in &reports {
        logger.add_record(report);
    }
    let manifest_path = config.manifest_path();
    logger.write_to_csv(&manifest_path)?;
    info!(path = %manifest_path.display(), levels = logger.len(), "wrote manifest");

    Ok(reports)
}

fn run_sequential(config: &WorkloadConfig) -> Result<Vec<LevelReport>> {
    FractionLevel::all()
        .map(|level| generate_level(config, level))
        .collect()
}

fn run_parallel(config: &WorkloadConfig) -> Result<Vec<LevelReport>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let levels: Vec<FractionLevel> = FractionLevel::all().collect();
    let results: Vec<Result<LevelReport>> = pool.install(|| {
        levels
            .into_par_iter()
            .map(|level| generate_level(config, level))
            .collect()
    });

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => failures.push(err),
        }
    }

    if failures.is_empty() {
        Ok(reports)
    } else {
        Err(WorkloadError::Levels(failures))
    }
}

/// Generates, writes and summarizes a single fraction level.
pub fn generate_level(config: &WorkloadConfig, level: FractionLevel) -> Result<LevelReport> {
    let span = info_span!("level", level = level.value());
    let _guard = span.enter();

    build_level(config, level).map_err(|err| {
        error!(error = %err, "fraction level failed");
        WorkloadError::level(level.value(), err)
    })
}

fn build_level(config: &WorkloadConfig, level: FractionLevel) -> Result<LevelReport> {
    let generator = RangeGenerator::new(config.dataset_size, config.topology)?
        .with_underflow_policy(config.underflow);
    let seed = config.level_seed(level);
    let mut rng = StdRng::seed_from_u64(seed);

    let (ranges, generation_time) =
        crate::measure_time!(generator.generate(config.queries, level, &mut rng));
    let ranges = ranges?;

    let path = config.level_path(level);
    let file_size_bytes = write_range_file(&path, &ranges)?;
    let stats = calculate_selectivity_stats(&ranges, config.dataset_size, config.topology);

    info!(
        path = %path.display(),
        ranges = ranges.len(),
        mean_selectivity = stats.mean_selectivity,
        elapsed = ?generation_time,
        "range file saved"
    );

    Ok(LevelReport {
        level,
        topology: config.topology,
        dataset_size: config.dataset_size,
        queries: config.queries,
        seed,
        path,
        file_size_bytes,
        generation_time,
        stats,
        sample: ranges.iter().take(SAMPLE_SIZE).copied().collect(),
    })
}
