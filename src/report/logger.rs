use std::{fs::File, path::Path};

use chrono::{DateTime, Local};
use csv::Writer;
use serde::Serialize;

use crate::error::{Result, WorkloadError};

use super::LevelReport;

/// A single manifest row that can be serialized to CSV.
///
/// This mirrors `LevelReport`, flattened into plain values: durations become
/// seconds and paths become strings.
#[derive(Serialize)]
struct ManifestRecord {
    pub level: u8,
    pub mixed: bool,
    pub topology: String,
    pub dataset_size: usize,
    pub queries: usize,
    pub target_count: Option<usize>,
    pub mean_selected: f64,
    pub min_selected: usize,
    pub max_selected: usize,
    pub mean_selectivity: f64,
    pub generation_time_secs: f32,
    pub file_size_bytes: u64,
    pub path: String,
    pub seed: u64,
    pub created_at: String,
}

/// Collects per-level reports of one run and writes them as a manifest.
pub struct WorkloadLogger {
    records: Vec<LevelReport>,
    created_at: DateTime<Local>,
}

impl WorkloadLogger {
    pub fn new() -> Self {
        WorkloadLogger {
            records: Vec::new(),
            created_at: Local::now(),
        }
    }

    pub fn add_record(&mut self, report: &LevelReport) {
        self.records.push(report.clone());
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_to_csv<P: AsRef<Path>>(&self, file_path: P) -> Result<()> {
        let file_path = file_path.as_ref();
        let file =
            File::create(file_path).map_err(|source| WorkloadError::io(file_path, source))?;
        let mut writer = Writer::from_writer(file);
        let created_at = self.created_at.to_rfc3339();

        for record in &self.records {
            writer.serialize(&ManifestRecord {
                level: record.level.value(),
                mixed: record.level.is_mixed(),
                topology: record.topology.to_string(),
                dataset_size: record.dataset_size,
                queries: record.queries,
                target_count: record.level.target_count(record.dataset_size),
                mean_selected: record.stats.mean_selected,
                min_selected: record.stats.min_selected,
                max_selected: record.stats.max_selected,
                mean_selectivity: record.stats.mean_selectivity,
                generation_time_secs: record.generation_time.as_secs_f32(),
                file_size_bytes: record.file_size_bytes,
                path: record.path.display().to_string(),
                seed: record.seed,
                created_at: created_at.clone(),
            })
            .map_err(|source| WorkloadError::Csv {
                path: file_path.to_path_buf(),
                source,
            })?;
        }

        writer
            .flush()
            .map_err(|source| WorkloadError::io(file_path, source))?;
        Ok(())
    }
}

impl Default for WorkloadLogger {
    fn default() -> Self {
        Self::new()
    }
}
