use rand::Rng;
use tracing::debug;

use crate::error::{Result, WorkloadError};

use super::{selected_count, FractionLevel, QueryRange, Topology, UnderflowPolicy, MIXED_CYCLE};

/// Draws synthetic range-filter queries over a dataset of `n` points.
pub struct RangeGenerator {
    n: usize,
    topology: Topology,
    underflow: UnderflowPolicy,
}

impl RangeGenerator {
    /// Creates a new range generator for the given dataset size.
    ///
    /// # Arguments
    ///
    /// * `n` - The number of indexable points. Must be in `[1, u32::MAX]` so
    ///   every endpoint fits the 32-bit range file layout.
    /// * `topology` - Whether ranges are contiguous or wrap around the domain.
    ///
    /// # Returns
    ///
    /// A generator using `UnderflowPolicy::Fail`, or `InvalidArgument` for an
    /// unusable `n`.
    pub fn new(n: usize, topology: Topology) -> Result<Self> {
        if n == 0 {
            return Err(WorkloadError::InvalidArgument(
                "dataset size must be positive".to_string(),
            ));
        }
        if n > u32::MAX as usize {
            return Err(WorkloadError::InvalidArgument(format!(
                "dataset size {} does not fit a 32-bit range endpoint",
                n
            )));
        }

        Ok(RangeGenerator {
            n,
            topology,
            underflow: UnderflowPolicy::default(),
        })
    }

    pub fn with_underflow_policy(mut self, underflow: UnderflowPolicy) -> Self {
        self.underflow = underflow;
        self
    }

    /// Generates exactly `q` ranges at the given fraction level.
    ///
    /// Fixed levels use `floor(n * 2^-f)` for every draw. The mixed level keeps
    /// a cursor local to this call that starts at 0 and advances modulo 11
    /// after each draw, recomputing the count each time.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        q: usize,
        level: FractionLevel,
        rng: &mut R,
    ) -> Result<Vec<QueryRange>> {
        let mut ranges = Vec::with_capacity(q);
        let mut cursor = 0u8;

        for _ in 0..q {
            let exponent = if level.is_mixed() { cursor } else { level.value() };
            let count = selected_count(self.n, exponent);
            let range = match self.topology {
                Topology::Closed => self.draw_closed(count, level, rng)?,
                Topology::Open => self.draw_open(count, rng),
            };
            ranges.push(range);

            if level.is_mixed() {
                cursor = (cursor + 1) % MIXED_CYCLE;
            }
        }

        debug!(
            level = level.value(),
            topology = %self.topology,
            n = self.n,
            q,
            "generated ranges"
        );
        Ok(ranges)
    }

    fn draw_closed<R: Rng + ?Sized>(
        &self,
        count: usize,
        level: FractionLevel,
        rng: &mut R,
    ) -> Result<QueryRange> {
        let count = self.closed_count(count, level)?;
        let l = rng.gen_range(0..=(self.n - count) as u64);
        let r = l + count as u64 - 1;
        Ok(QueryRange::new(l as u32, r as u32))
    }

    fn draw_open<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> QueryRange {
        // The upper bound is inclusive of n, so r == n is a valid draw.
        let r = rng.gen_range(0..=self.n as u64);
        QueryRange::new(wrap_left(r, count, self.n), r as u32)
    }

    fn closed_count(&self, count: usize, level: FractionLevel) -> Result<usize> {
        if count >= 1 && count <= self.n {
            return Ok(count);
        }
        match self.underflow {
            UnderflowPolicy::Fail => Err(WorkloadError::RangeUnderflow {
                level: level.value(),
                count,
                n: self.n,
            }),
            UnderflowPolicy::Clamp => Ok(count.clamp(1, self.n)),
        }
    }
}

/// `(r + count - 1) mod n`, with `count == 0` wrapping below zero.
fn wrap_left(r: u64, count: usize, n: usize) -> u32 {
    let n = n as u64;
    ((r + count as u64 + n - 1) % n) as u32
}

/// Generates `q` ranges over `n` points at fraction level `f`.
///
/// Convenience wrapper around `RangeGenerator` that validates a raw level.
pub fn generate<R: Rng + ?Sized>(
    n: usize,
    q: usize,
    f: u8,
    topology: Topology,
    rng: &mut R,
) -> Result<Vec<QueryRange>> {
    let level = FractionLevel::new(f)?;
    RangeGenerator::new(n, topology)?.generate(q, level, rng)
}
