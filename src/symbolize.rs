//! Row symbolization: turning matrix rows into ordered symbol sequences
//!
//! The suffix tries match rows by comparing their column-index sequences.
//! This module scans a CSC matrix once and produces, for every row, the
//! ordered sequence of its nonzero column indices together with the
//! associated values. The sequences are the matching alphabet for the
//! forest; they are transient and not part of the compressed artifact.

use num_traits::Num;

use crate::matrix::SparseMatrixCSC;

/// The ordered symbol sequence of one matrix row
///
/// Columns are ascending by construction of the column scan. A row with
/// no nonzeros is retained as an empty sequence rather than dropped, so
/// row ids stay aligned with the original matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSequence<T> {
    /// Nonzero column indices, ascending
    pub cols: Vec<usize>,

    /// Values aligned with `cols`
    pub values: Vec<T>,
}

impl<T> RowSequence<T> {
    /// Number of symbols in the sequence
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    /// True for rows without nonzeros
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}

/// Produce the symbol sequence of every row of a CSC matrix
///
/// The total symbol count over all sequences equals the matrix nnz.
/// Deterministic: identical input yields identical sequences. Duplicate
/// entries in the input show up as non-increasing sequences and are
/// rejected later, at trie insertion.
pub fn symbolize<T>(matrix: &SparseMatrixCSC<T>) -> Vec<RowSequence<T>>
where
    T: Copy + Num,
{
    let mut sequences: Vec<RowSequence<T>> = (0..matrix.n_rows)
        .map(|_| RowSequence {
            cols: Vec::new(),
            values: Vec::new(),
        })
        .collect();

    // Ascending column scan appends ascending symbols to every row
    for col in 0..matrix.n_cols {
        for (row, &value) in matrix.col_iter(col) {
            sequences[row].cols.push(col);
            sequences[row].values.push(value);
        }
    }

    sequences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SparseMatrixCSC;

    #[test]
    fn test_symbolize_basic() {
        //    [1 0 2]
        //    [0 3 0]
        //    [4 0 5]
        let matrix = SparseMatrixCSC::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 2, 1, 0, 2],
            vec![1, 4, 3, 2, 5],
        );

        let sequences = symbolize(&matrix);

        assert_eq!(sequences.len(), 3);
        assert_eq!(sequences[0].cols, vec![0, 2]);
        assert_eq!(sequences[0].values, vec![1, 2]);
        assert_eq!(sequences[1].cols, vec![1]);
        assert_eq!(sequences[1].values, vec![3]);
        assert_eq!(sequences[2].cols, vec![0, 2]);
        assert_eq!(sequences[2].values, vec![4, 5]);
    }

    #[test]
    fn test_total_symbol_count_equals_nnz() {
        let matrix = SparseMatrixCSC::new(
            4,
            4,
            vec![0, 1, 3, 3, 5],
            vec![2, 0, 3, 1, 2],
            vec![1.0f32, 2.0, 3.0, 4.0, 5.0],
        );

        let sequences = symbolize(&matrix);
        let total: usize = sequences.iter().map(|s| s.len()).sum();

        assert_eq!(total, matrix.nnz());
    }

    #[test]
    fn test_empty_row_retained() {
        // Row 1 has no nonzeros
        let matrix = SparseMatrixCSC::new(3, 2, vec![0, 1, 2], vec![0, 2], vec![1.0f32, 2.0]);

        let sequences = symbolize(&matrix);

        assert_eq!(sequences.len(), 3);
        assert!(sequences[1].is_empty());
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = SparseMatrixCSC::<f32>::zeros(0, 0);

        assert!(symbolize(&matrix).is_empty());
    }
}
