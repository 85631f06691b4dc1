//! Cost evaluation.
//!
//! The training cost is the mean binary cross-entropy of the final activation
//! against the labels, optionally plus an L2 penalty over the weight matrices
//! (biases are never penalized). Cost values are diagnostic: the backward pass
//! computes gradients independently, and the two are kept consistent (see the
//! finite-difference test in `backward`).

use crate::mat::Mat;
use crate::net::Net;

/// Mean binary cross-entropy: `-(1/m) * sum(y ln a + (1-y) ln(1-a))`.
///
/// Shape contract (panics on misuse): `pred` and `labels` are both `(1, m)`.
/// A zero-width batch has no mean and yields `NaN`; callers decide how to
/// surface that (see [`crate::train()`]).
pub fn bce(pred: &Mat, labels: &Mat) -> f64 {
    assert_eq!(
        pred.shape(),
        labels.shape(),
        "pred shape {:?} does not match labels shape {:?}",
        pred.shape(),
        labels.shape()
    );

    let m = pred.cols() as f64;
    let mut sum = 0.0_f64;
    for (&a, &y) in pred.data().iter().zip(labels.data()) {
        sum += y * a.ln() + (1.0 - y) * (1.0 - a).ln();
    }
    -sum / m
}

/// [`bce`] plus the L2 penalty `(lambda / (2m)) * sum of squared weights`.
pub fn bce_with_l2(pred: &Mat, labels: &Mat, net: &Net, lambda: f64) -> f64 {
    let m = pred.cols() as f64;
    let mut sq = 0.0_f64;
    for layer in net.layers() {
        for &w in layer.weights().data() {
            sq = w.mul_add(w, sq);
        }
    }
    bce(pred, labels) + lambda / (2.0 * m) * sq
}
