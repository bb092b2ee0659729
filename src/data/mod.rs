use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{Result, WorkloadError};

pub mod generator;
pub mod range_file;

/// The fraction level that cycles through `MIXED_CYCLE` selectivities.
pub const MIXED_LEVEL: u8 = 17;
/// Number of selectivities (2^0 .. 2^-10) the mixed level rotates through.
pub const MIXED_CYCLE: u8 = 11;
/// Number of range files produced by one driver run.
pub const LEVEL_COUNT: usize = MIXED_LEVEL as usize + 1;

/// A single query range over the index domain `[0, N)`.
///
/// How `l` and `r` are interpreted depends on the `Topology` the range was
/// drawn with: closed ranges select `l..=r`, open ranges select the wrapped
/// segment starting at `r` and ending at `l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryRange {
    pub l: u32,
    pub r: u32,
}

impl QueryRange {
    pub fn new(l: u32, r: u32) -> Self {
        QueryRange { l, r }
    }

    /// Number of indices this range selects over a domain of `n` points.
    ///
    /// For open ranges a selected count of zero wraps to `n`, so both read
    /// back as `n`. An empty domain selects nothing.
    pub fn selected_count(&self, n: usize, topology: Topology) -> usize {
        if n == 0 {
            return 0;
        }
        match topology {
            Topology::Closed => (self.r as usize + 1).saturating_sub(self.l as usize),
            Topology::Open => {
                let n = n as i64;
                (self.l as i64 - self.r as i64).rem_euclid(n) as usize + 1
            }
        }
    }
}

impl fmt::Display for QueryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.l, self.r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Contiguous ranges `[L, R]` with `L <= R`.
    #[default]
    Closed,
    /// Wraparound ranges, the complement of an excluded middle segment.
    Open,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Closed => write!(f, "closed"),
            Topology::Open => write!(f, "open"),
        }
    }
}

/// What the generator does when a closed range would select zero points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderflowPolicy {
    /// Stop with `WorkloadError::RangeUnderflow`.
    #[default]
    Fail,
    /// Clamp the selected count into `[1, N]`.
    Clamp,
}

/// Selectivity selector in `[0, 17]`.
///
/// Levels `0..=16` select `floor(N * 2^-f)` points per range. Level 17 is the
/// mixed schedule, which rotates through `2^0 .. 2^-10` one draw at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FractionLevel(u8);

impl FractionLevel {
    pub fn new(level: u8) -> Result<Self> {
        if level > MIXED_LEVEL {
            return Err(WorkloadError::InvalidArgument(format!(
                "fraction level {} is outside [0, {}]",
                level, MIXED_LEVEL
            )));
        }
        Ok(FractionLevel(level))
    }

    pub fn mixed() -> Self {
        FractionLevel(MIXED_LEVEL)
    }

    /// All levels a driver run produces, in file order.
    pub fn all() -> impl Iterator<Item = FractionLevel> {
        (0..=MIXED_LEVEL).map(FractionLevel)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_mixed(&self) -> bool {
        self.0 == MIXED_LEVEL
    }

    /// The per-range selected count for a fixed level, `None` for the mixed one.
    pub fn target_count(&self, n: usize) -> Option<usize> {
        if self.is_mixed() {
            None
        } else {
            Some(selected_count(n, self.0))
        }
    }

    /// Name of the range file holding this level's ranges.
    pub fn file_name(&self) -> String {
        format!("{}.bin", self.0)
    }
}

impl fmt::Display for FractionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `floor(n * 2^-exponent)`.
pub fn selected_count(n: usize, exponent: u8) -> usize {
    n.checked_shr(exponent as u32).unwrap_or(0)
}
