//! Conversions between our matrix formats and sprs
//!
//! The verification tooling around the engine compares matrices through
//! sprs, so both the plain formats and the compressed artifact (viewed
//! as a CSR over its logical rows) convert into `CsMat`.

use crate::encode::CompressedMatrix;
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};
use num_traits::Num;
use sprs::CsMat;

/// Converts our CSR matrix format to sprs CsMat format
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    CsMat::new(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
}

/// Converts our CSC matrix format to sprs CsMat format (as CSC)
pub fn to_sprs_csc<T>(matrix: &SparseMatrixCSC<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    CsMat::new_csc(
        (matrix.n_rows, matrix.n_cols),
        matrix.col_ptr.clone(),
        matrix.row_idx.clone(),
        matrix.values.clone(),
    )
}

/// Converts sprs CsMat in CSR format to our SparseMatrixCSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}

/// Converts sprs CsMat in CSC format to our SparseMatrixCSC format
pub fn from_sprs_csc<T>(matrix: CsMat<T>) -> SparseMatrixCSC<T>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csc() {
        matrix
    } else {
        matrix.to_csc()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSC::new(shape.0, shape.1, indptr, indices, data)
}

/// Views a compressed matrix as an sprs CSR over its logical rows
///
/// Residual and pattern rows appear as ordinary rows; the pattern map is
/// not applied. Useful for inspecting the stored artifact with sprs
/// tooling.
pub fn compressed_to_sprs<T>(compressed: &CompressedMatrix<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    CsMat::new(
        (compressed.logical_rows(), compressed.n_cols),
        compressed.row_ptr.clone(),
        compressed.col_idx.clone(),
        compressed.values.clone(),
    )
}
