//! Optimizers.
//!
//! Four interchangeable update strategies over a [`Net`] and its
//! [`Gradients`]: plain gradient descent, momentum, RMSProp, and Adam.
//!
//! Design notes:
//! - [`Optimizer`] is the *choice* (plus hyperparameters); [`OptimizerState`]
//!   owns the per-parameter accumulators. State lives outside the model and
//!   is reused by the training loop across steps.
//! - Each variant carries exactly the state its rule needs; the step counter
//!   `t` is shared by all layers within one `step` call and advances once per
//!   call.
//! - The RMSProp rule here steps by `lr / (eps + sqrt(s_hat))`: the raw
//!   gradient enters only through the second-moment accumulator `s`, so the
//!   step direction is fixed and only its magnitude adapts.

use crate::mat::Mat;
use crate::net::{Gradients, Net};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Optimizer choice for training.
pub enum Optimizer {
    /// Plain gradient descent: `p -= lr * g`.
    #[default]
    GradientDescent,
    /// Exponentially averaged gradients: `v = beta*v + (1-beta)*g; p -= lr*v`.
    Momentum { beta: f64 },
    /// Second-moment scaling with bias correction.
    RmsProp { beta: f64, eps: f64 },
    /// Adam (both moments bias-corrected).
    Adam { beta1: f64, beta2: f64, eps: f64 },
}

impl Optimizer {
    /// Validate optimizer hyperparameters.
    pub fn validate(self) -> Result<()> {
        match self {
            Optimizer::GradientDescent => Ok(()),
            Optimizer::Momentum { beta } => {
                check_beta("momentum beta", beta)?;
                Ok(())
            }
            Optimizer::RmsProp { beta, eps } => {
                check_beta("rmsprop beta", beta)?;
                check_eps("rmsprop eps", eps)?;
                Ok(())
            }
            Optimizer::Adam { beta1, beta2, eps } => {
                check_beta("adam beta1", beta1)?;
                check_beta("adam beta2", beta2)?;
                check_eps("adam eps", eps)?;
                Ok(())
            }
        }
    }

    /// Allocate optimizer state for `net`.
    pub fn state(self, net: &Net) -> Result<OptimizerState> {
        self.validate()?;

        match self {
            Optimizer::GradientDescent => Ok(OptimizerState::GradientDescent),
            Optimizer::Momentum { beta } => {
                let (vw, vb) = zeros_like_params(net);
                Ok(OptimizerState::Momentum {
                    beta,
                    v_weights: vw,
                    v_biases: vb,
                })
            }
            Optimizer::RmsProp { beta, eps } => {
                let (sw, sb) = zeros_like_params(net);
                Ok(OptimizerState::RmsProp {
                    beta,
                    eps,
                    t: 0,
                    beta_pow: 1.0,
                    s_weights: sw,
                    s_biases: sb,
                })
            }
            Optimizer::Adam { beta1, beta2, eps } => {
                let (vw, vb) = zeros_like_params(net);
                let (sw, sb) = zeros_like_params(net);
                Ok(OptimizerState::Adam {
                    beta1,
                    beta2,
                    eps,
                    t: 0,
                    beta1_pow: 1.0,
                    beta2_pow: 1.0,
                    v_weights: vw,
                    v_biases: vb,
                    s_weights: sw,
                    s_biases: sb,
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
/// Owned optimizer state.
///
/// `v_*` hold first-moment accumulators, `s_*` second-moment accumulators;
/// their shapes mirror the parameters they shadow. `beta*_pow` caches
/// `beta^t` for the bias corrections.
pub enum OptimizerState {
    /// Plain gradient descent (no state).
    GradientDescent,
    /// Momentum state.
    Momentum {
        beta: f64,
        v_weights: Vec<Mat>,
        v_biases: Vec<Mat>,
    },
    /// RMSProp state.
    RmsProp {
        beta: f64,
        eps: f64,
        t: u64,
        beta_pow: f64,
        s_weights: Vec<Mat>,
        s_biases: Vec<Mat>,
    },
    /// Adam state.
    Adam {
        beta1: f64,
        beta2: f64,
        eps: f64,
        t: u64,
        beta1_pow: f64,
        beta2_pow: f64,
        v_weights: Vec<Mat>,
        v_biases: Vec<Mat>,
        s_weights: Vec<Mat>,
        s_biases: Vec<Mat>,
    },
}

impl OptimizerState {
    /// Apply one optimizer step to every layer of `net`.
    ///
    /// `lr` is passed in from the training loop. All layers update within the
    /// same call; the parameter store is never left partially stepped.
    pub fn step(&mut self, net: &mut Net, grads: &Gradients, lr: f64) {
        assert!(lr.is_finite() && lr > 0.0, "lr must be finite and > 0");

        match self {
            OptimizerState::GradientDescent => {
                for idx in 0..net.num_layers() {
                    let layer = net.layer_mut(idx).expect("layer idx must be valid");
                    descend(layer.weights_mut(), grads.d_weights(idx), lr);
                    descend(layer.biases_mut(), grads.d_biases(idx), lr);
                }
            }
            OptimizerState::Momentum {
                beta,
                v_weights,
                v_biases,
            } => {
                debug_assert_eq!(v_weights.len(), net.num_layers());
                let decay = 1.0 - *beta;

                for idx in 0..net.num_layers() {
                    ema_update(&mut v_weights[idx], grads.d_weights(idx), *beta, decay);
                    ema_update(&mut v_biases[idx], grads.d_biases(idx), *beta, decay);

                    let layer = net.layer_mut(idx).expect("layer idx must be valid");
                    descend(layer.weights_mut(), &v_weights[idx], lr);
                    descend(layer.biases_mut(), &v_biases[idx], lr);
                }
            }
            OptimizerState::RmsProp {
                beta,
                eps,
                t,
                beta_pow,
                s_weights,
                s_biases,
            } => {
                debug_assert_eq!(s_weights.len(), net.num_layers());
                *t += 1;
                *beta_pow *= *beta;
                let corr = 1.0 - *beta_pow;
                let decay = 1.0 - *beta;

                for idx in 0..net.num_layers() {
                    let layer = net.layer_mut(idx).expect("layer idx must be valid");
                    rmsprop_update(
                        layer.weights_mut(),
                        &mut s_weights[idx],
                        grads.d_weights(idx),
                        *beta,
                        decay,
                        corr,
                        *eps,
                        lr,
                    );
                    rmsprop_update(
                        layer.biases_mut(),
                        &mut s_biases[idx],
                        grads.d_biases(idx),
                        *beta,
                        decay,
                        corr,
                        *eps,
                        lr,
                    );
                }
            }
            OptimizerState::Adam {
                beta1,
                beta2,
                eps,
                t,
                beta1_pow,
                beta2_pow,
                v_weights,
                v_biases,
                s_weights,
                s_biases,
            } => {
                debug_assert_eq!(v_weights.len(), net.num_layers());
                *t += 1;
                *beta1_pow *= *beta1;
                *beta2_pow *= *beta2;
                let coeffs = AdamCoeffs {
                    beta1: *beta1,
                    beta2: *beta2,
                    decay1: 1.0 - *beta1,
                    decay2: 1.0 - *beta2,
                    corr1: 1.0 - *beta1_pow,
                    corr2: 1.0 - *beta2_pow,
                    eps: *eps,
                    lr,
                };

                for idx in 0..net.num_layers() {
                    let layer = net.layer_mut(idx).expect("layer idx must be valid");
                    adam_update(
                        layer.weights_mut(),
                        &mut v_weights[idx],
                        &mut s_weights[idx],
                        grads.d_weights(idx),
                        &coeffs,
                    );
                    adam_update(
                        layer.biases_mut(),
                        &mut v_biases[idx],
                        &mut s_biases[idx],
                        grads.d_biases(idx),
                        &coeffs,
                    );
                }
            }
        }
    }
}

#[inline]
fn descend(param: &mut Mat, dir: &Mat, lr: f64) {
    debug_assert_eq!(param.shape(), dir.shape());
    for (p, &d) in param.data_mut().iter_mut().zip(dir.data()) {
        *p -= lr * d;
    }
}

#[inline]
fn ema_update(acc: &mut Mat, g: &Mat, beta: f64, decay: f64) {
    debug_assert_eq!(acc.shape(), g.shape());
    for (a, &g) in acc.data_mut().iter_mut().zip(g.data()) {
        *a = beta * *a + decay * g;
    }
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn rmsprop_update(
    param: &mut Mat,
    s: &mut Mat,
    g: &Mat,
    beta: f64,
    decay: f64,
    corr: f64,
    eps: f64,
    lr: f64,
) {
    debug_assert_eq!(param.shape(), g.shape());
    for ((p, s), &g) in param.data_mut().iter_mut().zip(s.data_mut()).zip(g.data()) {
        *s = beta * *s + decay * g * g;
        let s_hat = *s / corr;
        *p -= lr / (eps + s_hat.sqrt());
    }
}

/// Per-step Adam coefficients, computed once per `step` call.
#[derive(Debug, Clone, Copy)]
struct AdamCoeffs {
    beta1: f64,
    beta2: f64,
    decay1: f64,
    decay2: f64,
    corr1: f64,
    corr2: f64,
    eps: f64,
    lr: f64,
}

#[inline]
fn adam_update(param: &mut Mat, v: &mut Mat, s: &mut Mat, g: &Mat, c: &AdamCoeffs) {
    debug_assert_eq!(param.shape(), g.shape());
    for (((p, v), s), &g) in param
        .data_mut()
        .iter_mut()
        .zip(v.data_mut())
        .zip(s.data_mut())
        .zip(g.data())
    {
        *v = c.beta1 * *v + c.decay1 * g;
        *s = c.beta2 * *s + c.decay2 * g * g;
        let v_hat = *v / c.corr1;
        let s_hat = *s / c.corr2;
        *p -= c.lr * v_hat / (c.eps + s_hat.sqrt());
    }
}

fn zeros_like_params(net: &Net) -> (Vec<Mat>, Vec<Mat>) {
    let mut ws = Vec::with_capacity(net.num_layers());
    let mut bs = Vec::with_capacity(net.num_layers());
    for layer in net.layers() {
        ws.push(Mat::zeros(layer.out_dim(), layer.in_dim()));
        bs.push(Mat::zeros(layer.out_dim(), 1));
    }
    (ws, bs)
}

fn check_beta(name: &str, beta: f64) -> Result<()> {
    if !(beta.is_finite() && (0.0..1.0).contains(&beta)) {
        return Err(Error::InvalidConfig(format!(
            "{name} must be finite and in [0,1), got {beta}"
        )));
    }
    Ok(())
}

fn check_eps(name: &str, eps: f64) -> Result<()> {
    if !(eps.is_finite() && eps > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "{name} must be finite and > 0, got {eps}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Layer;

    fn scalar_net(w: f64, b: f64) -> Net {
        let layer = Layer::new(
            Mat::from_vec(1, 1, vec![w]).unwrap(),
            Mat::from_vec(1, 1, vec![b]).unwrap(),
        )
        .unwrap();
        Net::from_layers(vec![layer]).unwrap()
    }

    fn unit_grads(net: &Net, g: f64) -> Gradients {
        let mut grads = net.gradients();
        grads.d_weights_mut(0).set(0, 0, g);
        grads.d_biases_mut(0).set(0, 0, g);
        grads
    }

    #[test]
    fn validation_rejects_bad_hyperparams() {
        assert!(Optimizer::Momentum { beta: 1.0 }.validate().is_err());
        assert!(Optimizer::Momentum { beta: -0.1 }.validate().is_err());
        assert!(Optimizer::RmsProp { beta: 0.9, eps: 0.0 }.validate().is_err());
        assert!(
            Optimizer::Adam {
                beta1: 1.0,
                beta2: 0.999,
                eps: 1e-8
            }
            .validate()
            .is_err()
        );
        assert!(
            Optimizer::Adam {
                beta1: 0.9,
                beta2: f64::NAN,
                eps: 1e-8
            }
            .validate()
            .is_err()
        );
        assert!(Optimizer::GradientDescent.validate().is_ok());
    }

    #[test]
    fn state_accumulators_mirror_parameter_shapes() {
        let net = Net::init_with_seed(&[3, 4, 1], 0).unwrap();
        let state = Optimizer::Adam {
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
        .state(&net)
        .unwrap();

        match state {
            OptimizerState::Adam {
                v_weights,
                s_biases,
                t,
                ..
            } => {
                assert_eq!(t, 0);
                for (i, layer) in net.layers().iter().enumerate() {
                    assert_eq!(v_weights[i].shape(), layer.weights().shape());
                    assert_eq!(s_biases[i].shape(), layer.biases().shape());
                }
            }
            other => panic!("expected Adam state, got {other:?}"),
        }
    }

    #[test]
    fn gradient_descent_steps_by_lr_times_grad() {
        let mut net = scalar_net(1.0, 2.0);
        let grads = unit_grads(&net, 1.0);
        let mut state = Optimizer::GradientDescent.state(&net).unwrap();

        state.step(&mut net, &grads, 0.1);
        assert!((net.layers()[0].weights().get(0, 0) - 0.9).abs() < 1e-12);
        assert!((net.layers()[0].biases().get(0, 0) - 1.9).abs() < 1e-12);
    }

    #[test]
    fn momentum_warms_up_from_zero() {
        let mut net = scalar_net(1.0, 0.0);
        let grads = unit_grads(&net, 1.0);
        let mut state = Optimizer::Momentum { beta: 0.9 }.state(&net).unwrap();

        // v1 = 0.1, v2 = 0.9*0.1 + 0.1 = 0.19.
        state.step(&mut net, &grads, 0.1);
        assert!((net.layers()[0].weights().get(0, 0) - (1.0 - 0.1 * 0.1)).abs() < 1e-12);
        state.step(&mut net, &grads, 0.1);
        let expected = 1.0 - 0.1 * 0.1 - 0.1 * 0.19;
        assert!((net.layers()[0].weights().get(0, 0) - expected).abs() < 1e-12);
    }

    #[test]
    fn rmsprop_step_is_independent_of_gradient_sign() {
        let eps = 1e-8;
        let expected = 1.0 - 0.1 / (eps + 1.0);

        for g in [1.0, -1.0] {
            let mut net = scalar_net(1.0, 1.0);
            let grads = unit_grads(&net, g);
            let mut state = Optimizer::RmsProp { beta: 0.9, eps }.state(&net).unwrap();

            // s1 = 0.1 * g^2 = 0.1, s_hat = s1 / (1 - 0.9) = 1, step = lr / (eps + 1).
            state.step(&mut net, &grads, 0.1);
            assert!(
                (net.layers()[0].weights().get(0, 0) - expected).abs() < 1e-12,
                "g = {g}"
            );
        }
    }

    #[test]
    fn rmsprop_bias_correction_holds_under_constant_gradient() {
        // With g = 1 every bias-corrected second moment is exactly 1, so every
        // step subtracts lr / (eps + 1).
        let eps = 1e-8;
        let mut net = scalar_net(0.0, 0.0);
        let grads = unit_grads(&net, 1.0);
        let mut state = Optimizer::RmsProp { beta: 0.9, eps }.state(&net).unwrap();

        for k in 1..=3 {
            state.step(&mut net, &grads, 0.1);
            let expected = -(k as f64) * 0.1 / (eps + 1.0);
            assert!((net.layers()[0].weights().get(0, 0) - expected).abs() < 1e-12);
        }
        match state {
            OptimizerState::RmsProp { t, .. } => assert_eq!(t, 3),
            other => panic!("expected RmsProp state, got {other:?}"),
        }
    }

    #[test]
    fn adam_first_step_with_unit_grad() {
        let mut net = scalar_net(1.0, 1.0);
        let grads = unit_grads(&net, 1.0);
        let mut state = Optimizer::Adam {
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
        .state(&net)
        .unwrap();

        // Both bias-corrected moments are exactly 1 on the first step.
        state.step(&mut net, &grads, 0.1);
        let expected = 1.0 - 0.1 / (1e-8 + 1.0);
        assert!((net.layers()[0].weights().get(0, 0) - expected).abs() < 1e-12);
        assert!((net.layers()[0].biases().get(0, 0) - expected).abs() < 1e-12);
    }

    #[test]
    fn step_counter_advances_once_per_call_across_layers() {
        let mut net = Net::init_with_seed(&[2, 3, 1], 0).unwrap();
        let grads = net.gradients();
        let mut state = Optimizer::Adam {
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
        .state(&net)
        .unwrap();

        for _ in 0..4 {
            state.step(&mut net, &grads, 0.1);
        }
        match state {
            OptimizerState::Adam { t, .. } => assert_eq!(t, 4),
            other => panic!("expected Adam state, got {other:?}"),
        }
    }
}
