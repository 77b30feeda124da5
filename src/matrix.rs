//! Validated adjacency-matrix input.

use crate::error::IngestError;

/// A validated square 0/1 adjacency matrix. Only entries above the main
/// diagonal are inspected — the input is undirected and the diagonal is
/// meaningless, so both are ignored on read (matching the reference
/// fixtures, which carry nonzero diagonals the algorithm never looks at).
#[derive(Clone, Debug)]
pub struct AdjacencyMatrix {
    n: usize,
    rows: Vec<Vec<u8>>,
}

impl AdjacencyMatrix {
    /// Validate and wrap a row-major matrix. Only entries with `col > row`
    /// are checked for being `0` or `1`; anything else in the matrix
    /// (diagonal, lower triangle) is never read.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, IngestError> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(IngestError::NonSquareMatrix { rows: n, cols: row.len() });
            }
            for (j, &value) in row.iter().enumerate() {
                if j > i && value != 0 && value != 1 {
                    return Err(IngestError::InvalidEntry { row: i, col: j, value });
                }
            }
        }
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v as u8).collect())
            .collect();
        Ok(AdjacencyMatrix { n, rows })
    }

    /// Number of cells described by this matrix.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Whether cells `i` and `j` (`i < j`) share a net.
    pub fn connected(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < j);
        self.rows[i][j] == 1
    }
}
