//! Validated dataset container.
//!
//! A `Dataset` pairs a feature matrix with a binary label row. Examples are
//! columns: features have shape `(num_features, num_examples)` and labels
//! `(1, num_examples)` with entries in `{0, 1}`. Shape and label validation
//! happens here, once, so the training loop can assume a consistent pair.

use crate::mat::Mat;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Dataset {
    features: Mat,
    labels: Mat,
}

impl Dataset {
    /// Build a dataset from a `(num_features, m)` feature matrix and a
    /// `(1, m)` label row.
    pub fn new(features: Mat, labels: Mat) -> Result<Self> {
        if labels.rows() != 1 {
            return Err(Error::InvalidShape(format!(
                "labels must be a single row, got {} rows",
                labels.rows()
            )));
        }
        if features.cols() != labels.cols() {
            return Err(Error::InvalidShape(format!(
                "features have {} examples but labels have {}",
                features.cols(),
                labels.cols()
            )));
        }
        if features.cols() == 0 {
            return Err(Error::InvalidData(
                "dataset must contain at least one example".to_owned(),
            ));
        }
        for (i, &y) in labels.data().iter().enumerate() {
            if y != 0.0 && y != 1.0 {
                return Err(Error::InvalidData(format!(
                    "label {i} is {y}, expected 0 or 1"
                )));
            }
        }

        Ok(Self { features, labels })
    }

    #[inline]
    pub fn features(&self) -> &Mat {
        &self.features
    }

    #[inline]
    pub fn labels(&self) -> &Mat {
        &self.labels
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.features.rows()
    }

    #[inline]
    pub fn num_examples(&self) -> usize {
        self.features.cols()
    }
}
