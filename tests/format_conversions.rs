//! Tests for the sprs interop layer used by verification tooling

use rowfold::{
    compress_csc, compressed_to_sprs, from_sprs_csr, reconstruct, to_sprs_csc, to_sprs_csr,
    CompressionConfig, SparseMatrixCSC,
};

fn shared_rows_matrix() -> SparseMatrixCSC<f32> {
    // Rows {0, 2, 3} share columns {1, 4}, row 1 holds {0}
    SparseMatrixCSC::new(
        4,
        5,
        vec![0, 1, 4, 4, 4, 7],
        vec![1, 0, 2, 3, 0, 2, 3],
        vec![2.0, 1.0, 1.0, 1.0, 3.0, 3.0, 3.0],
    )
}

#[test]
fn test_reconstruction_matches_original_through_sprs() {
    let matrix = shared_rows_matrix();

    let (compressed, map) = compress_csc(&matrix, &CompressionConfig::new(2, 2)).unwrap();
    let reconstructed = reconstruct(&compressed, &map);

    // Compare through sprs: CSC input converted to CSR must equal the
    // reconstructed matrix
    let via_sprs = from_sprs_csr(to_sprs_csc(&matrix).to_csr());

    assert_eq!(reconstructed.row_ptr, via_sprs.row_ptr);
    assert_eq!(reconstructed.col_idx, via_sprs.col_idx);
    assert_eq!(reconstructed.values, via_sprs.values);
}

#[test]
fn test_compressed_artifact_views_as_sprs_matrix() {
    let matrix = shared_rows_matrix();

    let (compressed, _) = compress_csc(&matrix, &CompressionConfig::new(2, 2)).unwrap();
    let view = compressed_to_sprs(&compressed);

    assert_eq!(view.rows(), compressed.logical_rows());
    assert_eq!(view.cols(), compressed.n_cols);
    assert_eq!(view.nnz(), compressed.nnz());
}

#[test]
fn test_reconstructed_csr_roundtrips_through_sprs() {
    let matrix = shared_rows_matrix();

    let (compressed, map) = compress_csc(&matrix, &CompressionConfig::new(2, 2)).unwrap();
    let reconstructed = reconstruct(&compressed, &map);

    let roundtrip = from_sprs_csr(to_sprs_csr(&reconstructed));

    assert_eq!(roundtrip.row_ptr, reconstructed.row_ptr);
    assert_eq!(roundtrip.col_idx, reconstructed.col_idx);
    assert_eq!(roundtrip.values, reconstructed.values);
}
