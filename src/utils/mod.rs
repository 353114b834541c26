//! Utility functions and helpers

pub mod formats;

pub use formats::{compressed_to_sprs, from_sprs_csc, from_sprs_csr, to_sprs_csc, to_sprs_csr};

use std::ops::Range;

/// Computes an exclusive prefix sum (scan) for a vector
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

/// Split `n_rows` rows into at most `n_parts` disjoint contiguous ranges
///
/// The parallel phases operate on fixed partitions rather than one task
/// per row; workers never share a range, so no synchronization is needed
/// inside a partition.
pub fn row_partitions(n_rows: usize, n_parts: usize) -> Vec<Range<usize>> {
    let parts = n_parts.max(1);
    let chunk = n_rows.div_ceil(parts).max(1);

    (0..n_rows)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(n_rows))
        .collect()
}
