//! Mini-batch sampling.
//!
//! One [`MiniBatches`] value covers one epoch: a uniformly random permutation
//! of the example columns is drawn once at construction, then the permuted
//! columns are sliced into contiguous chunks of `batch_size`. Chunks are
//! gathered lazily; the iterator is finite and cannot be restarted.
//!
//! The chunk count is `1 + m / batch_size`, so the final chunk is shorter
//! than `batch_size`, and has width zero whenever `batch_size` divides `m`
//! exactly. Consumers must be prepared for that zero-width tail (see
//! [`crate::train()`]).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::mat::Mat;
use crate::{Error, Result};

#[derive(Debug)]
pub struct MiniBatches<'a> {
    features: &'a Mat,
    labels: &'a Mat,
    order: Vec<usize>,
    batch_size: usize,
    chunk: usize,
    num_chunks: usize,
}

impl<'a> MiniBatches<'a> {
    /// Shuffle the columns of `features`/`labels` and prepare the chunking.
    pub fn new<R: Rng + ?Sized>(
        features: &'a Mat,
        labels: &'a Mat,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be > 0".to_owned()));
        }
        if features.cols() != labels.cols() {
            return Err(Error::InvalidShape(format!(
                "features have {} examples but labels have {}",
                features.cols(),
                labels.cols()
            )));
        }

        let m = features.cols();
        let mut order: Vec<usize> = (0..m).collect();
        order.shuffle(rng);

        Ok(Self {
            features,
            labels,
            order,
            batch_size,
            chunk: 0,
            num_chunks: 1 + m / batch_size,
        })
    }

    /// Number of chunks this epoch will yield (including a zero-width tail
    /// when the batch size divides the example count).
    #[inline]
    pub fn num_chunks(&self) -> usize {
        self.num_chunks
    }
}

impl Iterator for MiniBatches<'_> {
    type Item = (Mat, Mat);

    fn next(&mut self) -> Option<Self::Item> {
        if self.chunk == self.num_chunks {
            return None;
        }

        let m = self.order.len();
        let start = (self.chunk * self.batch_size).min(m);
        let end = (start + self.batch_size).min(m);
        self.chunk += 1;

        let idx = &self.order[start..end];
        Some((self.features.gather_cols(idx), self.labels.gather_cols(idx)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.num_chunks - self.chunk;
        (left, Some(left))
    }
}
