//! Conversion functions between matrix formats

use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};
use num_traits::Num;

impl<T: Copy + Num> SparseMatrixCSR<T> {
    /// Converts this CSR matrix to CSC format
    pub fn to_csc(&self) -> SparseMatrixCSC<T> {
        // Count non-zeros per column
        let mut col_counts = vec![0; self.n_cols];

        for &col in &self.col_idx {
            col_counts[col] += 1;
        }

        // Compute column pointers via prefix sum
        let mut col_ptr = vec![0; self.n_cols + 1];
        let mut sum = 0;

        for (i, &count) in col_counts.iter().enumerate() {
            col_ptr[i] = sum;
            sum += count;
        }
        col_ptr[self.n_cols] = sum;

        // Allocate arrays for CSC matrix
        let nnz = self.nnz();
        let mut row_idx = vec![0; nnz];
        let mut values = vec![T::zero(); nnz];

        // Fill CSC matrix
        let mut temp_col_ptr = col_ptr.clone();

        for i in 0..self.n_rows {
            let row_start = self.row_ptr[i];
            let row_end = self.row_ptr[i + 1];

            for idx in row_start..row_end {
                let col = self.col_idx[idx];
                let pos = temp_col_ptr[col];

                row_idx[pos] = i;
                values[pos] = self.values[idx];

                temp_col_ptr[col] += 1;
            }
        }

        SparseMatrixCSC::new(self.n_rows, self.n_cols, col_ptr, row_idx, values)
    }
}

impl<T: Copy + Num> SparseMatrixCSC<T> {
    /// Converts this CSC matrix to CSR format
    pub fn to_csr(&self) -> SparseMatrixCSR<T> {
        // Count non-zeros per row
        let mut row_counts = vec![0; self.n_rows];

        for &row in &self.row_idx {
            row_counts[row] += 1;
        }

        // Compute row pointers via prefix sum
        let mut row_ptr = vec![0; self.n_rows + 1];
        let mut sum = 0;

        for (i, &count) in row_counts.iter().enumerate() {
            row_ptr[i] = sum;
            sum += count;
        }
        row_ptr[self.n_rows] = sum;

        // Allocate arrays for CSR matrix
        let nnz = self.nnz();
        let mut col_idx = vec![0; nnz];
        let mut values = vec![T::zero(); nnz];

        // Fill CSR matrix
        let mut temp_row_ptr = row_ptr.clone();

        for j in 0..self.n_cols {
            let col_start = self.col_ptr[j];
            let col_end = self.col_ptr[j + 1];

            for idx in col_start..col_end {
                let row = self.row_idx[idx];
                let pos = temp_row_ptr[row];

                col_idx[pos] = j;
                values[pos] = self.values[idx];

                temp_row_ptr[row] += 1;
            }
        }

        SparseMatrixCSR::new(self.n_rows, self.n_cols, row_ptr, col_idx, values)
    }
}
