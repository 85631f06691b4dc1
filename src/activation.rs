//! The logistic sigmoid.
//!
//! Every layer in this crate computes a pre-activation `z = W a + b` and then
//! applies `sigmoid` element-wise. The forward pass caches the *post-activation*
//! outputs, so the backward pass recovers the derivative from the cached value
//! via [`sigmoid_prime_from_output`] without needing a separate `z` buffer.

/// Numerically stable `1 / (1 + exp(-z))`.
///
/// The naive formula overflows `exp` for very negative `z`; splitting on the
/// sign keeps the exponent argument non-positive in both branches.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        let e = (-z).exp();
        1.0 / (1.0 + e)
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the sigmoid with respect to its input, expressed in terms of
/// the cached output `a = sigmoid(z)`: `sigmoid'(z) = a * (1 - a)`.
#[inline]
pub fn sigmoid_prime_from_output(a: f64) -> f64 {
    a * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_values() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn extreme_inputs_do_not_produce_nan() {
        for z in [1000.0, -1000.0, f64::MAX, f64::MIN] {
            let a = sigmoid(z);
            assert!(a.is_finite(), "sigmoid({z}) = {a}");
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn derivative_matches_output_identity() {
        for z in [-2.0, -0.3, 0.0, 0.7, 3.0] {
            let a = sigmoid(z);
            let g = sigmoid_prime_from_output(a);
            assert!((g - a * (1.0 - a)).abs() < 1e-15);
        }
        // Maximum slope is at z = 0.
        assert!((sigmoid_prime_from_output(sigmoid(0.0)) - 0.25).abs() < 1e-12);
    }
}
