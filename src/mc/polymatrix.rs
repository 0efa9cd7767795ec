//! Matrices whose entries are polynomials.
//!
//! Entries are coefficient vectors in decreasing powers. All entrywise
//! arithmetic goes through [`poly_add`](super::poly_add) and scalar scaling,
//! so cells of different lengths combine correctly.

use ndarray::ArrayView2;

use super::poly::poly_add;
use crate::error::{Error, Result};

/// A `rows × cols` grid of polynomials.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<f64>>,
}

impl PolyMatrix {
    /// Polynomial matrix with every cell set to `len` zero coefficients.
    pub fn zeros(rows: usize, cols: usize, len: usize) -> Self {
        PolyMatrix {
            rows,
            cols,
            cells: vec![vec![0.0; len]; rows * cols],
        }
    }

    /// `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Coefficients of entry `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> &[f64] {
        &self.cells[self.index(row, col)]
    }

    /// Replaces entry `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, poly: Vec<f64>) {
        let idx = self.index(row, col);
        self.cells[idx] = poly;
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}×{} polynomial matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// Transposed polynomial matrix.
    pub fn transpose(&self) -> PolyMatrix {
        let mut out = PolyMatrix::zeros(self.cols, self.rows, 0);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c).to_vec());
            }
        }
        out
    }

    /// Left product with a scalar matrix: `(S · M)[i][j] = Σₖ S[i,k] · M[k][j]`.
    ///
    /// Products are summed with untrimmed polynomial addition so the result
    /// keeps the common cell length.
    pub fn scalar_left_mul(&self, s: &ArrayView2<f64>) -> Result<PolyMatrix> {
        if s.ncols() != self.rows {
            return Err(Error::invalid_shape(
                "s",
                format!("a matrix with {} columns", self.rows),
                s.shape(),
            ));
        }

        let mut out = PolyMatrix::zeros(s.nrows(), self.cols, 0);
        for i in 0..s.nrows() {
            for j in 0..self.cols {
                let terms: Vec<Vec<f64>> = (0..self.rows)
                    .map(|k| scale(s[(i, k)], self.get(k, j)))
                    .collect();
                out.set(i, j, sum_untrimmed(&terms)?);
            }
        }
        Ok(out)
    }
}

fn scale(factor: f64, poly: &[f64]) -> Vec<f64> {
    poly.iter().map(|&c| factor * c).collect()
}

fn sum_untrimmed(terms: &[Vec<f64>]) -> Result<Vec<f64>> {
    if terms.is_empty() {
        return Ok(vec![0.0]);
    }
    poly_add(terms, false)
}
