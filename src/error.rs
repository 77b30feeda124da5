//! Error taxonomy for malformed input. Anything that isn't a violation of
//! caller-supplied data (i.e. an internal invariant break) is a bug and is
//! reported with `debug_assert!`, not one of these variants.

use thiserror::Error;

/// Failure modes when building a [`crate::partitioner::Partitioner`] from a
/// raw adjacency matrix.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The matrix was not square.
    #[error("adjacency matrix is not square: {rows} rows, {cols} columns")]
    NonSquareMatrix {
        /// Number of rows supplied.
        rows: usize,
        /// Number of columns supplied.
        cols: usize,
    },

    /// An entry outside of `{0, 1}` was found above the diagonal.
    #[error("adjacency matrix entry ({row}, {col}) is {value}, expected 0 or 1")]
    InvalidEntry {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The offending value.
        value: i64,
    },

    /// A restriction referenced a cell index that does not exist.
    #[error("restriction references cell {cell}, but the matrix only has {cell_count} cells")]
    RestrictionOutOfRange {
        /// The out-of-range cell index.
        cell: usize,
        /// Total number of cells in the matrix.
        cell_count: usize,
    },
}
