//! Matrix multiplication on the compressed representation
//!
//! The payoff of the compressed form: a pattern shared by `s` rows
//! contributes one dense accumulation instead of `s`. Phase (a) computes
//! every pattern's contribution vector and materializes it; phase (b)
//! accumulates the residual rows and scatters the finished contributions
//! into the output. The phase boundary is the only synchronization
//! point: contributions are written once and then only read.

use std::ops::AddAssign;

use ndarray::{Array2, ArrayView2};
use num_traits::Num;
use rayon::prelude::*;

use crate::encode::{CompressedMatrix, PatternMap};
use crate::matrix::{SparseMatrixCSR, SystemParameters};
use crate::utils::row_partitions;

/// Multiply the compressed representation by a dense matrix
///
/// Returns the dense `n_rows × width` product of the original matrix
/// and `x` without expanding the compressed form. Accumulation order
/// differs from a naive dense computation, so floating-point results may
/// deviate in the low bits.
///
/// # Panics
///
/// Panics if `x` does not have `n_cols` rows or the pattern map does not
/// belong to `compressed`.
pub fn compressed_spmm<T>(
    compressed: &CompressedMatrix<T>,
    map: &PatternMap,
    x: ArrayView2<T>,
    params: &SystemParameters,
) -> Array2<T>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    assert_eq!(
        x.nrows(),
        compressed.n_cols,
        "Dense operand rows must match matrix columns"
    );
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
    let width = x.ncols();

    // Phase (a): one contribution vector per pattern, complete before
    // any row reads it
    let contributions: Vec<Vec<T>> = (0..compressed.n_patterns)
        .into_par_iter()
        .map(|pattern| {
            let (cols, vals) = compressed.row_entries(n_rows + pattern);
            accumulate_entries(cols, vals, &x, width)
        })
        .collect();

    // Invert the map once so the row loop can look its patterns up
    let mut row_patterns: Vec<Vec<usize>> = vec![Vec::new(); n_rows];
    for (pattern, rows) in map.patterns.iter().enumerate() {
        for &row in rows {
            if row < n_rows {
                row_patterns[row].push(pattern);
            }
        }
    }

    // Phase (b): residual accumulation and contribution scatter over
    // disjoint row partitions
    let partitions = row_partitions(n_rows, params.n_threads);
    let blocks: Vec<Vec<T>> = partitions
        .into_par_iter()
        .map(|range| {
            let mut block = vec![T::zero(); range.len() * width];

            for row in range.clone() {
                let offset = (row - range.start) * width;
                let out = &mut block[offset..offset + width];

                let (cols, vals) = compressed.row_entries(row);
                for (i, &col) in cols.iter().enumerate() {
                    let val = vals[i];
                    for (acc, &operand) in out.iter_mut().zip(x.row(col).iter()) {
                        *acc += val * operand;
                    }
                }

                for &pattern in &row_patterns[row] {
                    for (acc, &contribution) in out.iter_mut().zip(contributions[pattern].iter()) {
                        *acc += contribution;
                    }
                }
            }

            block
        })
        .collect();

    let mut flat = Vec::with_capacity(n_rows * width);
    for block in blocks {
        flat.extend(block);
    }

    Array2::from_shape_vec((n_rows, width), flat)
        .expect("partitions cover exactly the output rows")
}

/// Dense accumulation of one sparse row against the operand
fn accumulate_entries<T>(cols: &[usize], vals: &[T], x: &ArrayView2<T>, width: usize) -> Vec<T>
where
    T: Copy + Num + AddAssign,
{
    let mut acc = vec![T::zero(); width];

    for (i, &col) in cols.iter().enumerate() {
        let val = vals[i];
        for (slot, &operand) in acc.iter_mut().zip(x.row(col).iter()) {
            *slot += val * operand;
        }
    }

    acc
}

/// Uncompressed sparse × dense multiplication
///
/// Row-by-row accumulation over the plain CSR; the baseline the
/// compressed path is validated and benchmarked against.
///
/// # Panics
///
/// Panics if `x` does not have `n_cols` rows.
pub fn reference_spmm<T>(matrix: &SparseMatrixCSR<T>, x: ArrayView2<T>) -> Array2<T>
where
    T: Copy + Num + AddAssign,
{
    assert_eq!(
        x.nrows(),
        matrix.n_cols,
        "Dense operand rows must match matrix columns"
    );

    let width = x.ncols();
    let mut result = Array2::zeros((matrix.n_rows, width));

    for row in 0..matrix.n_rows {
        for (col, &val) in matrix.row_iter(row) {
            for j in 0..width {
                result[[row, j]] += val * x[[col, j]];
            }
        }
    }

    result
}
