//! Dense row-major feature matrix.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::MLError;

/// A dense `n_rows × n_cols` matrix of `f32` features stored row-major.
///
/// A matrix may have zero columns, which is what an empty vocabulary
/// produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    data: Vec<f32>,
    n_rows: usize,
    n_cols: usize,
}

impl FeatureMatrix {
    /// Create a matrix from row-major data.
    pub fn new(n_rows: usize, n_cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(MLError::LengthMismatch {
                expected: n_rows * n_cols,
                actual: data.len(),
            }
            .into());
        }
        Ok(FeatureMatrix {
            data,
            n_rows,
            n_cols,
        })
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        FeatureMatrix {
            data: vec![0.0; n_rows * n_cols],
            n_rows,
            n_cols,
        }
    }

    /// Create an empty matrix with a fixed width.
    pub fn with_width(n_cols: usize) -> Self {
        Self::zeros(0, n_cols)
    }

    /// Build a matrix from equally sized rows.
    ///
    /// An empty row list gives a `0 × 0` matrix.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut matrix = Self::with_width(n_cols);
        for row in &rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    /// Append one row.
    pub fn push_row(&mut self, row: &[f32]) -> Result<()> {
        if row.len() != self.n_cols {
            return Err(MLError::invalid_features(format!(
                "expected {} features, got {}",
                self.n_cols,
                row.len()
            ))
            .into());
        }
        self.data.extend_from_slice(row);
        self.n_rows += 1;
        Ok(())
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Mutably borrow row `i`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.n_cols + col]
    }

    /// Gather the given rows, in the given order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols);
        for &i in indices {
            if i >= self.n_rows {
                return Err(MLError::invalid_features(format!(
                    "row index {} out of bounds for {} rows",
                    i, self.n_rows
                ))
                .into());
            }
            data.extend_from_slice(self.row(i));
        }
        Ok(FeatureMatrix {
            data,
            n_rows: indices.len(),
            n_cols: self.n_cols,
        })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Row-major backing slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Check that this matrix has the expected width.
    pub fn check_width(&self, expected: usize) -> Result<()> {
        if self.n_cols != expected {
            return Err(MLError::invalid_features(format!(
                "expected {} features, got {}",
                expected, self.n_cols
            ))
            .into());
        }
        Ok(())
    }
}
