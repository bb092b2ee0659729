use crate::data::{QueryRange, Topology};

/// Realized selectivity of one range file.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectivityStats {
    pub mean_selected: f64,
    pub min_selected: usize,
    pub max_selected: usize,
    /// `mean_selected / n`.
    pub mean_selectivity: f64,
}

/// Calculates how many of `n` points the given ranges select on average.
///
/// # Examples
/// ```
/// use range_workload_generator::data::{QueryRange, Topology};
/// use range_workload_generator::report::metrics::calculate_selectivity_stats;
///
/// let ranges = vec![QueryRange::new(0, 499), QueryRange::new(100, 599)];
/// let stats = calculate_selectivity_stats(&ranges, 1000, Topology::Closed);
/// assert_eq!(stats.mean_selected, 500.0);
/// assert_eq!(stats.mean_selectivity, 0.5);
/// ```
pub fn calculate_selectivity_stats(
    ranges: &[QueryRange],
    n: usize,
    topology: Topology,
) -> SelectivityStats {
    if ranges.is_empty() || n == 0 {
        return SelectivityStats::default();
    }

    let mut total = 0usize;
    let mut min_selected = usize::MAX;
    let mut max_selected = 0;
    for range in ranges {
        let selected = range.selected_count(n, topology);
        total += selected;
        min_selected = min_selected.min(selected);
        max_selected = max_selected.max(selected);
    }

    let mean_selected = total as f64 / ranges.len() as f64;
    SelectivityStats {
        mean_selected,
        min_selected,
        max_selected,
        mean_selectivity: mean_selected / n as f64,
    }
}
