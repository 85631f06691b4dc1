//! Backward propagation.
//!
//! Reverse-order chain rule over the cached activations. The output layer's
//! error term is `dZ_L = A_L - Y` (the BCE/sigmoid cancellation); each earlier
//! layer's is `dZ_l = (W_{l+1}^T * dZ_{l+1}) .* a (1 - a)` with `a` read from
//! the cache. Per layer, `dW_l = (1/m) dZ_l * A_{l-1}^T` and `db_l` is the
//! batch mean of `dZ_l`; with L2 enabled, `(lambda/m) W_l` is added to `dW_l`
//! only. Biases are never regularized.

use crate::activation::sigmoid_prime_from_output;
use crate::forward::Activations;
use crate::mat::Mat;
use crate::matmul::gemm;
use crate::net::{Gradients, Net};

impl Net {
    /// Compute loss gradients for one mini-batch into `grads`.
    ///
    /// `acts` must come from a forward pass of this net; `labels` is the
    /// `(1, m)` label row for the same batch. Overwrite semantics: every
    /// entry of `grads` is rewritten.
    ///
    /// Part of the low-level hot path: shape mismatches and a zero-width
    /// batch panic via `assert!`.
    pub fn backward(&self, acts: &Activations, labels: &Mat, lambda: f64, grads: &mut Gradients) {
        assert_eq!(
            acts.output().shape(),
            labels.shape(),
            "prediction shape {:?} does not match labels shape {:?}",
            acts.output().shape(),
            labels.shape()
        );
        let m = labels.cols();
        assert!(m > 0, "cannot backpropagate over an empty batch");
        let inv_m = 1.0 / m as f64;

        let mut dz = acts.output().clone();
        for (d, &y) in dz.data_mut().iter_mut().zip(labels.data()) {
            *d -= y;
        }

        for idx in (0..self.num_layers()).rev() {
            let layer = &self.layers()[idx];
            let a_prev = acts.a(idx);

            let dw = grads.d_weights_mut(idx);
            gemm(false, true, &dz, a_prev, dw);
            if lambda != 0.0 {
                let reg = lambda * inv_m;
                for (g, &w) in dw.data_mut().iter_mut().zip(layer.weights().data()) {
                    *g = *g * inv_m + reg * w;
                }
            } else {
                for g in dw.data_mut() {
                    *g *= inv_m;
                }
            }

            let db = grads.d_biases_mut(idx);
            for r in 0..layer.out_dim() {
                let mut sum = 0.0_f64;
                for c in 0..dz.cols() {
                    sum += dz.get(r, c);
                }
                db.set(r, 0, sum * inv_m);
            }

            if idx > 0 {
                let mut dz_prev = Mat::zeros(layer.in_dim(), m);
                gemm(true, false, layer.weights(), &dz, &mut dz_prev);
                for (d, &a) in dz_prev.data_mut().iter_mut().zip(a_prev.data()) {
                    *d *= sigmoid_prime_from_output(a);
                }
                dz = dz_prev;
            }
        }
    }
}
