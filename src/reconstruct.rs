//! Reconstruction of the original matrix from its compressed form
//!
//! The verification path: residual rows are copied verbatim, every
//! pattern row is replicated into the original rows its map entry
//! lists, and each row is order-normalized. Never on the multiplication
//! path.

use std::ops::AddAssign;

use num_traits::Num;

use crate::encode::{CompressedMatrix, PatternMap};
use crate::matrix::SparseMatrixCSR;
use crate::utils::exclusive_scan;

/// Expand a compressed matrix back into the original CSR
///
/// Duplicate `(row, col)` pairs are coalesced by summation while
/// normalizing; a lossless encoder never produces them, so their
/// presence in an artifact signals corruption upstream.
///
/// # Panics
///
/// Panics if the pattern map does not belong to `compressed`.
pub fn reconstruct<T>(compressed: &CompressedMatrix<T>, map: &PatternMap) -> SparseMatrixCSR<T>
where
    T: Copy + Num + AddAssign,
{
    assert_eq!(
        map.n_rows, compressed.n_rows,
        "Pattern map does not match the compressed matrix"
    );
    assert_eq!(
        map.len(),
        compressed.n_patterns,
        "Pattern map does not match the compressed matrix"
    );

    let n_rows = compressed.n_rows;

    // Residual rows verbatim
    let mut rows: Vec<Vec<(usize, T)>> = (0..n_rows)
        .map(|row| {
            let (cols, vals) = compressed.row_entries(row);
            cols.iter().copied().zip(vals.iter().copied()).collect()
        })
        .collect();

    // Replicate every pattern row into its mapped original rows
    for (pattern, targets) in map.patterns.iter().enumerate() {
        let (cols, vals) = compressed.row_entries(n_rows + pattern);
        for &row in targets {
            if row < n_rows {
                rows[row].extend(cols.iter().copied().zip(vals.iter().copied()));
            }
        }
    }

    // Order-normalize and coalesce
    let mut counts = Vec::with_capacity(n_rows);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();

    for mut entries in rows {
        entries.sort_by_key(|&(col, _)| col);

        let mut coalesced: Vec<(usize, T)> = Vec::with_capacity(entries.len());
        for (col, val) in entries {
            match coalesced.last_mut() {
                Some(last) if last.0 == col => last.1 += val,
                _ => coalesced.push((col, val)),
            }
        }

        counts.push(coalesced.len());
        for (col, val) in coalesced {
            col_idx.push(col);
            values.push(val);
        }
    }

    let row_ptr = exclusive_scan(&counts);

    SparseMatrixCSR::new(n_rows, compressed.n_cols, row_ptr, col_idx, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_replicates_pattern_rows() {
        // Residual: row 1 holds column 1; pattern row [0, 2, 3] maps to
        // rows {0, 2, 3, 4}
        let compressed = CompressedMatrix {
            n_rows: 5,
            n_cols: 5,
            n_patterns: 1,
            row_ptr: vec![0, 0, 1, 1, 1, 1, 4],
            col_idx: vec![1, 0, 2, 3],
            values: vec![1.0f32; 4],
        };
        let map = PatternMap {
            n_rows: 5,
            patterns: vec![vec![0, 2, 3, 4]],
        };

        let matrix = reconstruct(&compressed, &map);

        assert_eq!(matrix.n_rows, 5);
        assert_eq!(matrix.n_cols, 5);
        assert_eq!(matrix.nnz(), 13);
        assert_eq!(matrix.row_ptr, vec![0, 3, 4, 7, 10, 13]);
        assert_eq!(matrix.col_idx, vec![0, 2, 3, 1, 0, 2, 3, 0, 2, 3, 0, 2, 3]);
    }

    #[test]
    fn test_reconstruct_without_patterns_copies_residuals() {
        let compressed = CompressedMatrix {
            n_rows: 2,
            n_cols: 3,
            n_patterns: 0,
            row_ptr: vec![0, 2, 3],
            col_idx: vec![0, 2, 1],
            values: vec![1.0f32, 2.0, 3.0],
        };
        let map = PatternMap {
            n_rows: 2,
            patterns: vec![],
        };

        let matrix = reconstruct(&compressed, &map);

        assert_eq!(matrix.row_ptr, vec![0, 2, 3]);
        assert_eq!(matrix.col_idx, vec![0, 2, 1]);
        assert_eq!(matrix.values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reconstruct_merges_residual_and_pattern_entries() {
        // Row 0 keeps a residual entry between the pattern's columns
        let compressed = CompressedMatrix {
            n_rows: 1,
            n_cols: 4,
            n_patterns: 1,
            row_ptr: vec![0, 1, 3],
            col_idx: vec![2, 0, 3],
            values: vec![5.0f32, 1.0, 2.0],
        };
        let map = PatternMap {
            n_rows: 1,
            patterns: vec![vec![0]],
        };

        let matrix = reconstruct(&compressed, &map);

        assert_eq!(matrix.col_idx, vec![0, 2, 3]);
        assert_eq!(matrix.values, vec![1.0, 5.0, 2.0]);
    }

    #[test]
    fn test_duplicates_coalesce_by_summation() {
        // A corrupt artifact where the pattern repeats a residual
        // column; the expansion sums the pair instead of dropping it
        let compressed = CompressedMatrix {
            n_rows: 1,
            n_cols: 2,
            n_patterns: 1,
            row_ptr: vec![0, 1, 2],
            col_idx: vec![0, 0],
            values: vec![1.0f32, 2.0],
        };
        let map = PatternMap {
            n_rows: 1,
            patterns: vec![vec![0]],
        };

        let matrix = reconstruct(&compressed, &map);

        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.values, vec![3.0]);
    }

    #[test]
    fn test_map_ids_past_boundary_ignored() {
        let compressed = CompressedMatrix {
            n_rows: 1,
            n_cols: 2,
            n_patterns: 1,
            row_ptr: vec![0, 0, 1],
            col_idx: vec![1],
            values: vec![4.0f32],
        };
        let map = PatternMap {
            n_rows: 1,
            patterns: vec![vec![0, 7]],
        };

        let matrix = reconstruct(&compressed, &map);

        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.col_idx, vec![1]);
    }
}
