//! Compressed encoding: residual rows, pattern rows and the pattern map
//!
//! The compressed representation is an ordinary CSR layout extended with
//! synthetic rows: indices `[0, n_rows)` hold each original row's
//! residual entries (the nonzeros no selected pattern explains), indices
//! `[n_rows, n_rows + k)` hold each pattern's literal entries exactly
//! once. The companion [`PatternMap`] records which original rows
//! inherit each pattern row. Re-expanding residuals and inherited
//! patterns reproduces the original nonzero set exactly.

use std::io;

use log::info;
use num_traits::Num;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::forest::SelectedPattern;
use crate::matrix::{SparseMatrixCSR, SystemParameters};
use crate::utils::row_partitions;

/// The durable compressed artifact: a CSR layout over `n_rows + k`
/// logical rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedMatrix<T> {
    /// Original row count; the boundary separating residual rows from
    /// pattern rows
    pub n_rows: usize,

    /// Column count of the original matrix
    pub n_cols: usize,

    /// Number of pattern rows appended after the residuals (`k`)
    pub n_patterns: usize,

    /// Row pointers over all logical rows (size: n_rows + k + 1)
    pub row_ptr: Vec<usize>,

    /// Column indices (size: stored nnz)
    pub col_idx: Vec<usize>,

    /// Values (size: stored nnz)
    pub values: Vec<T>,
}

impl<T> CompressedMatrix<T> {
    /// Residual plus pattern rows
    pub fn logical_rows(&self) -> usize {
        self.n_rows + self.n_patterns
    }

    /// Number of stored nonzero entries (residual + pattern entries)
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// The entries of one logical row as parallel slices
    pub fn row_entries(&self, row: usize) -> (&[usize], &[T]) {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        (&self.col_idx[start..end], &self.values[start..end])
    }

    /// Total element count across the three arrays, the unit the
    /// compression ratio is measured in
    pub fn stored_elements(&self) -> usize {
        self.row_ptr.len() + self.col_idx.len() + self.values.len()
    }
}

/// Pattern→rows mapping persisted beside the compressed CSR
///
/// One entry per pattern row, in row-index order; `n_rows` repeats the
/// boundary so the record is self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMap {
    /// Boundary separating residual rows from pattern rows
    pub n_rows: usize,

    /// For each pattern row, the original rows inheriting it
    pub patterns: Vec<Vec<usize>>,
}

impl PatternMap {
    /// Number of selected patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no pattern was selected
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Total element count of the mapping lists
    pub fn stored_elements(&self) -> usize {
        self.patterns.iter().map(|rows| rows.len()).sum()
    }
}

/// Encode a matrix against its selected pattern set
///
/// Residual computation is independent per row and runs over disjoint
/// row partitions sized by `params.n_threads`. Patterns must carry
/// disjoint row sets, which the selector guarantees.
pub fn encode<T>(
    matrix: &SparseMatrixCSR<T>,
    patterns: &[SelectedPattern<T>],
    params: &SystemParameters,
) -> (CompressedMatrix<T>, PatternMap)
where
    T: Copy + Num + Send + Sync,
{
    let n_rows = matrix.n_rows;

    // Which pattern, if any, explains part of each row
    let mut assignment: Vec<Option<usize>> = vec![None; n_rows];
    for (index, pattern) in patterns.iter().enumerate() {
        for &row in &pattern.rows {
            debug_assert!(assignment[row].is_none(), "row {} doubly covered", row);
            assignment[row] = Some(index);
        }
    }

    // Residuals per row, computed partition-wise
    let partitions = row_partitions(n_rows, params.n_threads);
    let partial: Vec<Vec<(Vec<usize>, Vec<T>)>> = partitions
        .into_par_iter()
        .map(|range| {
            range
                .map(|row| {
                    let start = matrix.row_ptr[row];
                    let end = matrix.row_ptr[row + 1];
                    let cols = &matrix.col_idx[start..end];
                    let vals = &matrix.values[start..end];

                    match assignment[row] {
                        Some(index) => subtract_pattern(cols, vals, &patterns[index].cols),
                        None => (cols.to_vec(), vals.to_vec()),
                    }
                })
                .collect()
        })
        .collect();

    // Assemble the extended CSR: residual rows first
    let mut row_ptr = Vec::with_capacity(n_rows + patterns.len() + 1);
    row_ptr.push(0);

    let mut running_nnz = 0;
    for partition in &partial {
        for (cols, _) in partition {
            running_nnz += cols.len();
            row_ptr.push(running_nnz);
        }
    }

    let pattern_nnz: usize = patterns.iter().map(|p| p.cols.len()).sum();
    let mut col_idx = Vec::with_capacity(running_nnz + pattern_nnz);
    let mut values = Vec::with_capacity(running_nnz + pattern_nnz);

    for partition in partial {
        for (cols, vals) in partition {
            col_idx.extend(cols);
            values.extend(vals);
        }
    }

    // Pattern rows appended after the residuals
    for pattern in patterns {
        col_idx.extend_from_slice(&pattern.cols);
        values.extend_from_slice(&pattern.values);
        row_ptr.push(col_idx.len());
    }

    let compressed = CompressedMatrix {
        n_rows,
        n_cols: matrix.n_cols,
        n_patterns: patterns.len(),
        row_ptr,
        col_idx,
        values,
    };
    let map = PatternMap {
        n_rows,
        patterns: patterns.iter().map(|p| p.rows.clone()).collect(),
    };

    info!(
        "encoded {} nnz as {} residual + {} pattern entries across {} patterns",
        matrix.nnz(),
        compressed.nnz() - pattern_nnz,
        pattern_nnz,
        patterns.len()
    );

    (compressed, map)
}

/// Drop the entries a pattern explains from one row
///
/// Both column lists are ascending and the pattern columns are a subset
/// of the row's, so a single merge pass suffices.
fn subtract_pattern<T: Copy>(
    cols: &[usize],
    vals: &[T],
    pattern_cols: &[usize],
) -> (Vec<usize>, Vec<T>) {
    let keep = cols.len().saturating_sub(pattern_cols.len());
    let mut out_cols = Vec::with_capacity(keep);
    let mut out_vals = Vec::with_capacity(keep);

    let mut next = 0;
    for (i, &col) in cols.iter().enumerate() {
        if next < pattern_cols.len() && pattern_cols[next] == col {
            next += 1;
        } else {
            out_cols.push(col);
            out_vals.push(vals[i]);
        }
    }
    debug_assert_eq!(next, pattern_cols.len(), "pattern columns not all present in row");

    (out_cols, out_vals)
}

/// Elements of the original CSR divided by elements of the compressed
/// CSR plus the mapping lists
pub fn compression_ratio<T>(
    compressed: &CompressedMatrix<T>,
    map: &PatternMap,
    original: &SparseMatrixCSR<T>,
) -> f64 {
    let original_elements = original.row_ptr.len() + 2 * original.values.len();
    let compressed_elements = compressed.stored_elements() + map.stored_elements();

    original_elements as f64 / compressed_elements as f64
}

/// Serialize a pattern map as JSON to any writer
pub fn write_pattern_map<W: io::Write>(map: &PatternMap, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer(writer, map)
}

/// Deserialize a pattern map written by [`write_pattern_map`]
pub fn read_pattern_map<R: io::Read>(reader: R) -> serde_json::Result<PatternMap> {
    serde_json::from_reader(reader)
}

/// Serialize a compressed matrix as JSON to any writer
pub fn write_compressed<T, W>(compressed: &CompressedMatrix<T>, writer: W) -> serde_json::Result<()>
where
    T: Serialize,
    W: io::Write,
{
    serde_json::to_writer(writer, compressed)
}

/// Deserialize a compressed matrix written by [`write_compressed`]
pub fn read_compressed<T, R>(reader: R) -> serde_json::Result<CompressedMatrix<T>>
where
    T: DeserializeOwned,
    R: io::Read,
{
    serde_json::from_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::SelectedPattern;
    use crate::matrix::SystemParameters;

    fn params() -> SystemParameters {
        SystemParameters { n_threads: 2 }
    }

    /// CSR form of the 5×5 matrix with rows {0, 2, 3, 4} sharing
    /// columns {0, 2, 3}
    fn repeated_rows_csr() -> SparseMatrixCSR<f32> {
        SparseMatrixCSR::new(
            5,
            5,
            vec![0, 3, 4, 7, 10, 13],
            vec![0, 2, 3, 1, 0, 2, 3, 0, 2, 3, 0, 2, 3],
            vec![1.0; 13],
        )
    }

    #[test]
    fn test_encode_with_one_pattern() {
        let matrix = repeated_rows_csr();
        let patterns = vec![SelectedPattern {
            cols: vec![0, 2, 3],
            values: vec![1.0f32; 3],
            rows: vec![0, 2, 3, 4],
        }];

        let (compressed, map) = encode(&matrix, &patterns, &params());

        assert_eq!(compressed.n_rows, 5);
        assert_eq!(compressed.n_patterns, 1);
        assert_eq!(compressed.logical_rows(), 6);

        // Residuals: only row 1 keeps an entry; the pattern row follows
        assert_eq!(compressed.row_ptr, vec![0, 0, 1, 1, 1, 1, 4]);
        assert_eq!(compressed.col_idx, vec![1, 0, 2, 3]);
        assert_eq!(compressed.values, vec![1.0; 4]);

        assert_eq!(map.n_rows, 5);
        assert_eq!(map.patterns, vec![vec![0, 2, 3, 4]]);
    }

    #[test]
    fn test_encode_without_patterns_is_identity() {
        let matrix = repeated_rows_csr();

        let (compressed, map) = encode(&matrix, &[], &params());

        assert_eq!(compressed.n_patterns, 0);
        assert_eq!(compressed.row_ptr, matrix.row_ptr);
        assert_eq!(compressed.col_idx, matrix.col_idx);
        assert_eq!(compressed.values, matrix.values);
        assert!(map.is_empty());
    }

    #[test]
    fn test_partial_residual() {
        // Row 0: [0, 2, 5], pattern explains [0, 5]
        let matrix = SparseMatrixCSR::new(
            2,
            6,
            vec![0, 3, 5],
            vec![0, 2, 5, 0, 5],
            vec![1.0f32, 7.0, 2.0, 1.0, 2.0],
        );
        let patterns = vec![SelectedPattern {
            cols: vec![0, 5],
            values: vec![1.0f32, 2.0],
            rows: vec![0, 1],
        }];

        let (compressed, _) = encode(&matrix, &patterns, &params());

        // Row 0 keeps column 2, row 1 is fully explained
        assert_eq!(compressed.row_ptr, vec![0, 1, 1, 3]);
        assert_eq!(compressed.col_idx, vec![2, 0, 5]);
        assert_eq!(compressed.values, vec![7.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = SparseMatrixCSR::<f32>::zeros(0, 0);

        let (compressed, map) = encode(&matrix, &[], &params());

        assert_eq!(compressed.logical_rows(), 0);
        assert_eq!(compressed.row_ptr, vec![0]);
        assert!(compressed.col_idx.is_empty());
        assert!(map.is_empty());
    }

    #[test]
    fn test_compression_ratio_improves_with_sharing() {
        let matrix = repeated_rows_csr();
        let patterns = vec![SelectedPattern {
            cols: vec![0, 2, 3],
            values: vec![1.0f32; 3],
            rows: vec![0, 2, 3, 4],
        }];

        let (compressed, map) = encode(&matrix, &patterns, &params());
        let ratio = compression_ratio(&compressed, &map, &matrix);

        assert!(ratio > 1.0, "expected savings, ratio was {}", ratio);
    }

    #[test]
    fn test_artifact_roundtrip() {
        let matrix = repeated_rows_csr();
        let patterns = vec![SelectedPattern {
            cols: vec![0, 2, 3],
            values: vec![1.0f32; 3],
            rows: vec![0, 2, 3, 4],
        }];
        let (compressed, map) = encode(&matrix, &patterns, &params());

        let mut map_bytes = Vec::new();
        write_pattern_map(&map, &mut map_bytes).unwrap();
        let map_back = read_pattern_map(map_bytes.as_slice()).unwrap();
        assert_eq!(map_back, map);

        let mut csr_bytes = Vec::new();
        write_compressed(&compressed, &mut csr_bytes).unwrap();
        let csr_back: CompressedMatrix<f32> = read_compressed(csr_bytes.as_slice()).unwrap();
        assert_eq!(csr_back, compressed);
    }
}
