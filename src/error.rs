use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors produced while generating, writing or loading range workloads.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// A caller supplied a value outside the accepted domain, e.g. a fraction
    /// level above 17 or an empty dataset.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The selected count for a closed range dropped to zero, so no interval
    /// `[L, L + cnt - 1]` inside `[0, N)` exists.
    #[error(
        "range underflow at fraction level {level}: selected count {count} cannot form a closed range over {n} points"
    )]
    RangeUnderflow { level: u8, count: usize, n: usize },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A range file whose contents do not follow the 8-byte record layout.
    #[error("malformed range file: {0}")]
    Format(String),

    #[error("failed to write manifest {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("fraction level {level} failed: {source}")]
    Level {
        level: u8,
        #[source]
        source: Box<WorkloadError>,
    },

    /// Every per-level failure of a parallel run.
    #[error("{} fraction levels failed", .0.len())]
    Levels(Vec<WorkloadError>),
}

impl WorkloadError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WorkloadError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn level(level: u8, source: WorkloadError) -> Self {
        WorkloadError::Level {
            level,
            source: Box::new(source),
        }
    }

    /// Returns the fraction level this error is attributed to, if any.
    pub fn failed_level(&self) -> Option<u8> {
        match self {
            WorkloadError::Level { level, .. } => Some(*level),
            WorkloadError::RangeUnderflow { level, .. } => Some(*level),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkloadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = WorkloadError::io(
            "out/3.bin",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error at out/3.bin: denied");
    }

    #[test]
    fn test_level_error_wraps_source() {
        let err = WorkloadError::level(
            12,
            WorkloadError::RangeUnderflow {
                level: 12,
                count: 0,
                n: 1000,
            },
        );
        assert_eq!(err.failed_level(), Some(12));
        assert!(err.to_string().starts_with("fraction level 12 failed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
