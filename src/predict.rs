//! Prediction helpers.
//!
//! Consumers of a trained net: run a forward pass, threshold the final
//! activation at 0.5, and compare against ground truth.

use crate::mat::Mat;
use crate::net::Net;
use crate::{Error, Result};

/// Predict a `{0, 1}` label per example column of `features`.
///
/// Returns a `(1, num_examples)` matrix.
pub fn predict(net: &Net, features: &Mat) -> Result<Mat> {
    if features.rows() != net.input_dim() {
        return Err(Error::InvalidShape(format!(
            "features have {} rows but the net expects {}",
            features.rows(),
            net.input_dim()
        )));
    }

    let acts = net.forward(features.clone());
    let mut labels = acts.output().clone();
    for v in labels.data_mut() {
        *v = f64::from(*v > 0.5);
    }
    Ok(labels)
}

/// Fraction of predicted labels matching `labels`.
pub fn accuracy(predicted: &Mat, labels: &Mat) -> Result<f64> {
    if predicted.shape() != labels.shape() {
        return Err(Error::InvalidShape(format!(
            "predicted shape {:?} does not match labels shape {:?}",
            predicted.shape(),
            labels.shape()
        )));
    }
    if predicted.cols() == 0 {
        return Err(Error::InvalidData(
            "accuracy needs at least one example".to_owned(),
        ));
    }

    let hits = predicted
        .data()
        .iter()
        .zip(labels.data())
        .filter(|(p, y)| p == y)
        .count();
    Ok(hits as f64 / predicted.cols() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Layer;

    #[test]
    fn thresholds_at_one_half() {
        // Identity-ish single weight, zero bias: sign of the input decides.
        let layer = Layer::new(
            Mat::from_rows(&[vec![5.0]]).unwrap(),
            Mat::zeros(1, 1),
        )
        .unwrap();
        let net = Net::from_layers(vec![layer]).unwrap();

        let x = Mat::from_rows(&[vec![-2.0, -0.1, 0.1, 3.0]]).unwrap();
        let pred = predict(&net, &x).unwrap();
        assert_eq!(pred.data(), &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn accuracy_counts_matches() {
        let pred = Mat::from_rows(&[vec![1.0, 0.0, 1.0, 1.0]]).unwrap();
        let truth = Mat::from_rows(&[vec![1.0, 0.0, 0.0, 1.0]]).unwrap();
        assert!((accuracy(&pred, &truth).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn shape_mismatches_are_rejected() {
        let net = Net::init_with_seed(&[3, 1], 0).unwrap();
        assert!(matches!(
            predict(&net, &Mat::zeros(2, 4)),
            Err(Error::InvalidShape(_))
        ));

        let a = Mat::zeros(1, 2);
        let b = Mat::zeros(1, 3);
        assert!(matches!(accuracy(&a, &b), Err(Error::InvalidShape(_))));
    }
}
