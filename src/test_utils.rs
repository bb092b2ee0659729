use rand::{rngs::StdRng, SeedableRng};

use crate::data::QueryRange;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A handful of ranges covering endpoint edge cases: zero, a full 32-bit
/// value and a wrapped pair where `l < r`.
pub fn sample_ranges() -> Vec<QueryRange> {
    vec![
        QueryRange::new(0, 499),
        QueryRange::new(250, 749),
        QueryRange::new(49, 50),
        QueryRange::new(u32::MAX - 1, u32::MAX),
        QueryRange::new(0, 0),
    ]
}
