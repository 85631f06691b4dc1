//! Dense `f64` matrices.
//!
//! Everything in this crate is a `Mat`: weights, biases, feature batches,
//! activations, gradients. Storage is a flat row-major buffer with explicit
//! dimensions; element `(r, c)` lives at `r * cols + c`.
//!
//! Batches put one example per *column*: a feature batch has shape
//! `(num_features, batch_size)` and a label batch `(1, batch_size)`.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Mat {
    /// All-zeros matrix with the given shape.
    #[inline]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from a flat row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidShape(format!(
                "buffer length {} does not match shape ({rows}, {cols})",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from per-row slices.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidData("matrix must have at least one row".to_owned()));
        }
        let cols = rows[0].len();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidData(format!(
                    "row {r} has len {}, expected {cols}",
                    row.len()
                )));
            }
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        debug_assert!(r < self.rows && c < self.cols);
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        debug_assert!(r < self.rows && c < self.cols);
        self.data[r * self.cols + c] = value;
    }

    /// Flat row-major view of the matrix.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Mutable view of row `r`.
    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        debug_assert!(r < self.rows);
        let start = r * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Copy the columns named by `indices`, in order, into a new matrix.
    ///
    /// An empty `indices` slice yields a `(rows, 0)` matrix.
    pub fn gather_cols(&self, indices: &[usize]) -> Mat {
        debug_assert!(indices.iter().all(|&c| c < self.cols));

        let mut out = Mat::zeros(self.rows, indices.len());
        for r in 0..self.rows {
            let src = r * self.cols;
            let dst = r * indices.len();
            for (k, &c) in indices.iter().enumerate() {
                out.data[dst + k] = self.data[src + c];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_validates_buffer_length() {
        assert!(Mat::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).is_ok());
        assert!(Mat::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Mat::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn gather_cols_copies_in_order() {
        let m = Mat::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let g = m.gather_cols(&[2, 0]);
        assert_eq!(g.shape(), (2, 2));
        assert_eq!(g.data(), &[3.0, 1.0, 6.0, 4.0]);

        let empty = m.gather_cols(&[]);
        assert_eq!(empty.shape(), (2, 0));
    }
}
