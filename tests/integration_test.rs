#[cfg(test)]
mod tests {
    use std::fs;

    use range_workload_generator::{
        data::{range_file::RECORD_SIZE, selected_count, LEVEL_COUNT},
        decode, driver, read_range_file, FractionLevel, Topology, WorkloadConfig,
    };

    const N: usize = 1 << 16;
    const Q: usize = 64;

    fn run_into(dir: &std::path::Path, config: WorkloadConfig) {
        let reports = driver::run(&config).unwrap();
        assert_eq!(reports.len(), LEVEL_COUNT);
        for (report, level) in reports.iter().zip(FractionLevel::all()) {
            assert_eq!(report.level, level);
            assert_eq!(report.path, dir.join(level.file_name()));
        }
    }

    #[test]
    fn test_every_level_holds_q_records() {
        let dir = tempfile::tempdir().unwrap();
        run_into(
            dir.path(),
            WorkloadConfig::new(N, Q, dir.path(), Topology::Closed, 42),
        );

        for f in 0..LEVEL_COUNT {
            let path = dir.path().join(format!("{}.bin", f));
            assert_eq!(fs::metadata(&path).unwrap().len(), (Q * RECORD_SIZE) as u64);
        }
    }

    #[test]
    fn test_closed_files_respect_bounds() {
        let dir = tempfile::tempdir().unwrap();
        run_into(
            dir.path(),
            WorkloadConfig::new(N, Q, dir.path(), Topology::Closed, 7),
        );

        for f in 0..=16u8 {
            let count = selected_count(N, f) as u32;
            let ranges = read_range_file(dir.path().join(format!("{}.bin", f))).unwrap();
            for range in ranges {
                assert_eq!(range.r, range.l + count - 1);
                assert!((range.r as usize) < N);
            }
        }

        let mixed = read_range_file(dir.path().join("17.bin")).unwrap();
        for (i, range) in mixed.iter().enumerate() {
            assert_eq!(
                range.selected_count(N, Topology::Closed),
                N >> (i % 11)
            );
        }
    }

    #[test]
    fn test_open_files_wrap() {
        let dir = tempfile::tempdir().unwrap();
        run_into(
            dir.path(),
            WorkloadConfig::new(N, Q, dir.path(), Topology::Open, 7),
        );

        for f in 0..=16u8 {
            let count = selected_count(N, f);
            let ranges = read_range_file(dir.path().join(format!("{}.bin", f))).unwrap();
            for range in ranges {
                assert!(range.r as usize <= N);
                assert_eq!(range.l as usize, (range.r as usize + count + N - 1) % N);
            }
        }
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        run_into(
            first.path(),
            WorkloadConfig::new(N, Q, first.path(), Topology::Open, 1234),
        );
        run_into(
            second.path(),
            WorkloadConfig::new(N, Q, second.path(), Topology::Open, 1234),
        );

        for f in 0..LEVEL_COUNT {
            let name = format!("{}.bin", f);
            assert_eq!(
                fs::read(first.path().join(&name)).unwrap(),
                fs::read(second.path().join(&name)).unwrap()
            );
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = tempfile::tempdir().unwrap();
        let parallel = tempfile::tempdir().unwrap();
        run_into(
            sequential.path(),
            WorkloadConfig::new(N, Q, sequential.path(), Topology::Closed, 99),
        );
        run_into(
            parallel.path(),
            WorkloadConfig::new(N, Q, parallel.path(), Topology::Closed, 99).with_parallelism(4),
        );

        for f in 0..LEVEL_COUNT {
            let name = format!("{}.bin", f);
            let expected = fs::read(sequential.path().join(&name)).unwrap();
            let actual = fs::read(parallel.path().join(&name)).unwrap();
            assert_eq!(decode(&expected).unwrap(), decode(&actual).unwrap());
        }
    }

    #[test]
    fn test_manifest_has_row_per_level() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkloadConfig::new(N, Q, dir.path().join("ranges"), Topology::Closed, 5);
        driver::run(&config).unwrap();

        let mut reader = csv::Reader::from_path(config.manifest_path()).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), LEVEL_COUNT);
        assert_eq!(&rows[1][5], (N / 2).to_string());
        assert_eq!(&rows[17][1], "true");
    }

    #[test]
    fn test_zero_queries_write_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        run_into(
            dir.path(),
            WorkloadConfig::new(1000, 0, dir.path(), Topology::Closed, 42),
        );

        for f in 0..LEVEL_COUNT {
            let path = dir.path().join(format!("{}.bin", f));
            assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        }
    }
}
