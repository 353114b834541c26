//! # rowfold: suffix-trie compression for sparse matrices
//!
//! rowfold compresses sparse adjacency matrices whose rows repeat the
//! same nonzero structure, the typical shape of graph workloads where
//! many nodes share neighbor sets, and multiplies the compressed form
//! by dense matrices without expanding it.
//!
//! ## Overview
//!
//! A compression run walks four stages:
//!
//! 1. **Symbolization**: every row becomes the ordered sequence of its
//!    nonzero column indices.
//! 2. **Forest construction**: up to `m` suffix tries index the
//!    sequences, each trie sampling a different segment window; nodes
//!    shared by several rows propose pattern candidates.
//! 3. **Selection**: candidates are scored by
//!    `l·(rows−1)·len − len` and fixed greedily under disjoint row
//!    coverage.
//! 4. **Encoding**: residual rows and pattern rows form an extended CSR
//!    beside a pattern→rows map; the pair is the durable artifact.
//!
//! Consumers either expand the artifact back with
//! [`reconstruct`](fn@reconstruct) for verification or multiply it
//! directly with [`multiply`]: a pattern shared by `s` rows costs one
//! accumulation instead of `s`.
//!
//! ## Usage
//!
//! Compression takes the matrix in raw CSC arrays:
//!
//! ```
//! use rowfold::compress;
//!
//! // 2×2 identity: nothing to share
//! let (compressed, map) = compress(&[0, 1, 2], &[0, 1], &[1.0, 1.0], 2, 2, 2, 1).unwrap();
//! assert_eq!(compressed.n_patterns, 0);
//! assert!(map.is_empty());
//! ```
//!
//! Repeated rows are factored out once and multiplied once:
//!
//! ```
//! use ndarray::arr2;
//! use rowfold::{compress, multiply, reconstruct};
//!
//! // Rows 0 and 2 share the nonzero columns {0, 2}
//! let (compressed, map) = compress(
//!     &[0, 2, 3, 5],
//!     &[0, 2, 1, 0, 2],
//!     &[1.0; 5],
//!     3, 3, 2, 1,
//! ).unwrap();
//! assert_eq!(compressed.n_patterns, 1);
//!
//! let x = arr2(&[[1.0f32, 0.0], [0.0, 1.0], [1.0, 1.0]]);
//! let y = multiply(&compressed, &map, x.view());
//! assert_eq!(y[[0, 0]], 2.0);
//!
//! let original = reconstruct(&compressed, &map);
//! assert_eq!(original.nnz(), 5);
//! ```

pub mod encode;
pub mod error;
pub mod forest;
pub mod matmul;
pub mod matrix;
pub mod reconstruct;
pub mod symbolize;
pub mod trie;
pub mod utils;

// Re-export primary components
pub use encode::{
    compression_ratio, encode, read_compressed, read_pattern_map, write_compressed,
    write_pattern_map, CompressedMatrix, PatternMap,
};
pub use error::{FoldError, Result};
pub use forest::{
    build_forest, discover_patterns, select_patterns, LambdaScore, ScorePolicy, SelectedPattern,
};
pub use matmul::{compressed_spmm, reference_spmm};
pub use matrix::{CompressionConfig, SparseMatrixCSC, SparseMatrixCSR, SystemParameters};
pub use reconstruct::reconstruct;
pub use symbolize::{symbolize, RowSequence};
pub use trie::{PatternCandidate, SuffixTrie};
pub use utils::{compressed_to_sprs, from_sprs_csc, from_sprs_csr, to_sprs_csc, to_sprs_csr};

use log::info;
use ndarray::{Array2, ArrayView2};
use num_traits::Num;
use std::ops::AddAssign;

/// Compress a sparse matrix given in raw CSC arrays
///
/// This is the main entry point of the library. The arrays follow the
/// usual CSC conventions: `col_ptr` has `n_cols + 1` monotonically
/// non-decreasing offsets starting at 0, `row_indices` and `values`
/// run in parallel over the nonzeros. `lambda` weights pattern sharing
/// in the scoring objective and `n_tries` bounds the candidate forest;
/// both must be at least 1.
///
/// # Errors
///
/// Fails fast with a [`FoldError`] on inconsistent array lengths,
/// non-monotonic pointers, out-of-range row indices or invalid
/// parameters; no partial state is retained.
///
/// # Examples
///
/// ```
/// use rowfold::compress;
///
/// let (compressed, map) = compress(
///     &[0, 2, 2, 4],
///     &[0, 1, 0, 1],
///     &[1.0, 1.0, 1.0, 1.0],
///     2, 3, 2, 1,
/// ).unwrap();
///
/// // Both rows share {0, 2}: one pattern, empty residuals
/// assert_eq!(compressed.n_patterns, 1);
/// assert_eq!(map.patterns, vec![vec![0, 1]]);
/// ```
pub fn compress(
    col_ptr: &[i32],
    row_indices: &[i32],
    values: &[f32],
    n_rows: usize,
    n_cols: usize,
    lambda: usize,
    n_tries: usize,
) -> Result<(CompressedMatrix<f32>, PatternMap)> {
    if lambda < 1 {
        return Err(FoldError::InvalidParameter {
            name: "lambda",
            value: lambda,
        });
    }
    if n_tries < 1 {
        return Err(FoldError::InvalidParameter {
            name: "n_tries",
            value: n_tries,
        });
    }

    let matrix = validate_csc(col_ptr, row_indices, values, n_rows, n_cols)?;
    compress_csc(&matrix, &CompressionConfig::new(lambda, n_tries))
}

/// Compress an already validated CSC matrix under an explicit config
///
/// The generic pipeline behind [`compress`]: symbolize, build the
/// forest, select patterns, encode. Trie memory is released before the
/// artifact is returned.
pub fn compress_csc<T>(
    matrix: &SparseMatrixCSC<T>,
    config: &CompressionConfig,
) -> Result<(CompressedMatrix<T>, PatternMap)>
where
    T: Copy + Num + Send + Sync,
{
    let sequences = symbolize(matrix);
    let patterns = discover_patterns(&sequences, config)?;

    let csr = matrix.to_csr();
    let (compressed, map) = encode::encode(&csr, &patterns, &config.system_params);

    info!(
        "compressed {}×{} matrix, ratio {:.3}",
        matrix.n_rows,
        matrix.n_cols,
        compression_ratio(&compressed, &map, &csr)
    );

    Ok((compressed, map))
}

/// Multiply a compressed matrix by a dense operand
///
/// Convenience wrapper over [`compressed_spmm`] with default system
/// parameters. Returns the dense `n_rows × width` result of the
/// original matrix times `x`.
pub fn multiply<T>(
    compressed: &CompressedMatrix<T>,
    map: &PatternMap,
    x: ArrayView2<T>,
) -> Array2<T>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    compressed_spmm(compressed, map, x, &SystemParameters::default())
}

/// Validate raw CSC arrays and convert them into the internal format
fn validate_csc(
    col_ptr: &[i32],
    row_indices: &[i32],
    values: &[f32],
    n_rows: usize,
    n_cols: usize,
) -> Result<SparseMatrixCSC<f32>> {
    if col_ptr.len() != n_cols + 1 {
        return Err(FoldError::LengthMismatch {
            name: "col_ptr",
            expected: n_cols + 1,
            actual: col_ptr.len(),
        });
    }
    if values.len() != row_indices.len() {
        return Err(FoldError::LengthMismatch {
            name: "values",
            expected: row_indices.len(),
            actual: values.len(),
        });
    }
    if col_ptr[0] != 0 {
        return Err(FoldError::InvalidPointerStart {
            value: col_ptr[0] as i64,
        });
    }
    for position in 1..col_ptr.len() {
        if col_ptr[position] < col_ptr[position - 1] {
            return Err(FoldError::NonMonotonicColPtr { position });
        }
    }
    let nnz = col_ptr[n_cols] as usize;
    if row_indices.len() != nnz {
        return Err(FoldError::LengthMismatch {
            name: "row_indices",
            expected: nnz,
            actual: row_indices.len(),
        });
    }
    for col in 0..n_cols {
        for idx in col_ptr[col] as usize..col_ptr[col + 1] as usize {
            let row = row_indices[idx];
            if row < 0 || row as usize >= n_rows {
                return Err(FoldError::RowIndexOutOfRange {
                    index: row as i64,
                    n_rows,
                    col,
                });
            }
        }
    }

    Ok(SparseMatrixCSC::new(
        n_rows,
        n_cols,
        col_ptr.iter().map(|&p| p as usize).collect(),
        row_indices.iter().map(|&r| r as usize).collect(),
        values.to_vec(),
    ))
}

/// Version information for the rowfold library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
