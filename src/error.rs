//! The unified error type for the crate.
//!
//! Structural problems with caller-supplied arrays are reported through
//! `FoldError` before any trie or compressed state is built. Internal
//! invariants on values the crate constructed itself stay as assertions.

use thiserror::Error;

/// Errors surfaced by the compression entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FoldError {
    /// An input array does not have the length implied by the matrix shape.
    #[error("{name} has length {actual}, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The column pointer array does not begin at offset zero.
    #[error("column pointer array must start at 0, found {value}")]
    InvalidPointerStart { value: i64 },

    /// The column pointer array decreases somewhere.
    #[error("column pointer array decreases at position {position}")]
    NonMonotonicColPtr { position: usize },

    /// A row index falls outside `[0, n_rows)`.
    #[error("row index {index} out of range for {n_rows} rows (column {col})")]
    RowIndexOutOfRange {
        index: i64,
        n_rows: usize,
        col: usize,
    },

    /// A row's symbol sequence is not strictly increasing, so the trie's
    /// order-preserving matching cannot be used.
    #[error("row {row}: symbol sequence not strictly increasing at position {position}")]
    UnsortedRowSequence { row: usize, position: usize },

    /// A tuning parameter is outside its documented domain.
    #[error("parameter `{name}` is {value}, must be at least 1")]
    InvalidParameter { name: &'static str, value: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FoldError>;
