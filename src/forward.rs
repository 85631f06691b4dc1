//! Forward propagation.
//!
//! One pass computes, for every layer `l`, the pre-activation
//! `Z_l = W_l * A_{l-1} + b_l` (bias broadcast over the batch columns) and the
//! activation `A_l = sigmoid(Z_l)`. All activations are cached: the backward
//! pass needs every `A_l`, and the sigmoid derivative is recovered from the
//! cached outputs directly.

use crate::activation::sigmoid;
use crate::mat::Mat;
use crate::matmul::gemm;
use crate::net::Net;

/// Activation cache from one forward pass.
///
/// Index 0 holds the input batch; index `l` holds `A_l` with shape
/// `(n_l, batch_size)`. Read-only once produced, and only valid for the
/// parameters that produced it.
#[derive(Debug, Clone)]
pub struct Activations {
    acts: Vec<Mat>,
}

impl Activations {
    /// Activation of layer `l` (`l = 0` is the input batch).
    #[inline]
    pub fn a(&self, l: usize) -> &Mat {
        &self.acts[l]
    }

    /// The final activation `A_L`, i.e. the prediction.
    #[inline]
    pub fn output(&self) -> &Mat {
        self.acts.last().expect("cache holds at least the input")
    }

    #[inline]
    pub fn batch_size(&self) -> usize {
        self.acts[0].cols()
    }
}

impl Net {
    /// Run a forward pass over `input` (shape `(input_dim, batch_size)`).
    ///
    /// Part of the low-level hot path: an input with the wrong number of rows
    /// panics via `assert!`. Shape-checked entry points live in
    /// [`crate::train()`] and [`crate::predict()`].
    pub fn forward(&self, input: Mat) -> Activations {
        assert_eq!(
            input.rows(),
            self.input_dim(),
            "input has {} features, net expects {}",
            input.rows(),
            self.input_dim()
        );

        let batch = input.cols();
        let mut acts = Vec::with_capacity(self.num_layers() + 1);
        acts.push(input);

        for layer in self.layers() {
            let mut z = Mat::zeros(layer.out_dim(), batch);
            gemm(false, false, layer.weights(), &acts[acts.len() - 1], &mut z);

            for r in 0..layer.out_dim() {
                let b = layer.biases().get(r, 0);
                for v in z.row_mut(r) {
                    *v = sigmoid(*v + b);
                }
            }
            acts.push(z);
        }

        Activations { acts }
    }
}
