use std::{
    error::Error,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use rand::{thread_rng, Rng};
use tracing::info;

use range_workload_generator::{
    config::WorkloadConfig,
    data::{
        range_file::{read_range_file, read_range_file_limited, RECORD_SIZE},
        Topology, UnderflowPolicy,
    },
    driver,
    report::{metrics::calculate_selectivity_stats, LevelReport},
    telemetry, WorkloadError,
};

#[derive(Parser)]
#[clap(
    name = "range-workload-generator",
    about = "Generates range-filter query workloads for range-filtered ANN benchmarks"
)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Writes one range file per fraction level (0..=17) into the output directory.
    Generate {
        /// Number of data points.
        #[clap(long, action)]
        n: usize,
        /// Number of queries per file.
        #[clap(long, action)]
        q: usize,
        #[clap(long, short, action)]
        output_dir: PathBuf,
        #[clap(long, short, value_enum, default_value_t = Topology::Closed)]
        topology: Topology,
        #[clap(long, short, action)]
        seed: Option<u64>,
        /// Clamp zero-width closed ranges to single points instead of failing.
        #[clap(long, action)]
        clamp_underflow: bool,
        /// Generate fraction levels concurrently.
        #[clap(long, short, action)]
        parallel: bool,
        /// Worker threads for parallel generation, implies --parallel.
        #[clap(long, action)]
        threads: Option<usize>,
    },
    /// Prints the ranges stored in a range file.
    Inspect {
        file: PathBuf,
        /// Number of data points, enables selectivity statistics.
        #[clap(long, action)]
        n: Option<usize>,
        #[clap(long, short, value_enum, default_value_t = Topology::Closed)]
        topology: Topology,
        #[clap(long, short, default_value_t = 10)]
        limit: usize,
        /// Load at most this many ranges, as a harness with this query count would.
        #[clap(long, short, action)]
        queries: Option<usize>,
    },
}

fn main() -> ExitCode {
    telemetry::init_subscriber();
    let args = Args::parse();

    let result = match args.command {
        Command::Generate {
            n,
            q,
            output_dir,
            topology,
            seed,
            clamp_underflow,
            parallel,
            threads,
        } => {
            let seed = seed.unwrap_or_else(|| {
                let seed: u64 = thread_rng().gen();
                info!(seed, "no seed given, drew one");
                seed
            });
            let underflow = if clamp_underflow {
                UnderflowPolicy::Clamp
            } else {
                UnderflowPolicy::Fail
            };

            let config = WorkloadConfig::new(n, q, output_dir, topology, seed)
                .with_underflow(underflow)
                .with_parallel_options(parallel, threads);
            generate(&config)
        }
        Command::Inspect {
            file,
            n,
            topology,
            limit,
            queries,
        } => inspect(&file, n, topology, limit, queries),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn generate(config: &WorkloadConfig) -> Result<(), WorkloadError> {
    for report in driver::run(config)? {
        print_level_report(&report);
    }
    println!("manifest saved to {}", config.manifest_path().display());
    Ok(())
}

fn inspect(
    file: &Path,
    n: Option<usize>,
    topology: Topology,
    limit: usize,
    queries: Option<usize>,
) -> Result<(), WorkloadError> {
    let ranges = match queries {
        Some(queries) => read_range_file_limited(file, queries)?,
        None => read_range_file(file)?,
    };

    println!("\n--- Range File Report ---");
    println!("File: {}", file.display());
    println!("Ranges loaded: {}", ranges.len());
    println!("Loaded size: {} bytes", ranges.len() * RECORD_SIZE);
    for (i, range) in ranges.iter().take(limit).enumerate() {
        println!("  [{}] {}", i, range);
    }
    if let Some(n) = n {
        let stats = calculate_selectivity_stats(&ranges, n, topology);
        println!("Mean selected: {:.2}", stats.mean_selected);
        println!("Min/Max selected: {}/{}", stats.min_selected, stats.max_selected);
        println!("Mean selectivity: {:.6}", stats.mean_selectivity);
    }
    println!("-------------------------\n");
    Ok(())
}

fn print_level_report(report: &LevelReport) {
    println!(
        "generated index ranges for {} data points, {} queries, fraction {}, {}",
        report.dataset_size, report.queries, report.level, report.topology
    );
    println!("index ranges saved to {}", report.path.display());
    println!("example ranges: [{}]", report.sample_display());
}

fn print_error(err: &WorkloadError) {
    match err {
        WorkloadError::Levels(failures) => {
            eprintln!("error: {}", err);
            for failure in failures {
                print_error(failure);
            }
        }
        _ => {
            eprintln!("error: {}", err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
        }
    }
}
