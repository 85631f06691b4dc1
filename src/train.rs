//! The training loop.
//!
//! [`train`] wires the whole engine together: initialize parameters for the
//! sizes list `[n_features] + hidden_layers + [1]`, allocate the optimizer
//! state once, then per epoch shuffle into mini-batches and run a forward
//! pass, the cost evaluation, a backward pass, and one optimizer step for
//! each batch. The per-batch step is atomic with respect to the parameter
//! store: validation failures happen before any mutation, and a numeric
//! failure aborts the run instead of training on corrupted values.

use tracing::debug;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::batch::MiniBatches;
use crate::cost::{bce, bce_with_l2};
use crate::data::Dataset;
use crate::net::Net;
use crate::optim::Optimizer;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Weight penalty applied to the cost and its gradients.
pub enum Regularization {
    #[default]
    None,
    /// L2 penalty `(lambda / (2m)) * sum of squared weights` (biases exempt).
    L2,
}

#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Hidden layer widths; empty means logistic regression.
    pub hidden_layers: Vec<usize>,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Regularization strength; only read when `regularization` enables it.
    pub lambda: f64,
    pub regularization: Regularization,
    pub optimizer: Optimizer,
    pub mini_batch_size: usize,
    /// Seeds both parameter initialization and the per-epoch shuffles.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            hidden_layers: Vec::new(),
            epochs: 100,
            learning_rate: 0.1,
            lambda: 0.0,
            regularization: Regularization::None,
            optimizer: Optimizer::GradientDescent,
            mini_batch_size: 64,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    /// The trained parameter store.
    pub net: Net,
    /// Average training cost per epoch, in epoch order.
    pub epoch_costs: Vec<f64>,
}

/// Train a feed-forward sigmoid network on `data`.
///
/// Configuration and shape problems are detected before any parameter is
/// touched. A cost that turns non-finite, or a degenerate zero-width
/// mini-batch, aborts the run with [`Error::Numeric`].
pub fn train(data: &Dataset, cfg: &TrainConfig) -> Result<TrainReport> {
    if cfg.epochs == 0 {
        return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
    }
    if !(cfg.learning_rate.is_finite() && cfg.learning_rate > 0.0) {
        return Err(Error::InvalidConfig(
            "learning rate must be finite and > 0".to_owned(),
        ));
    }
    if !(cfg.lambda.is_finite() && cfg.lambda >= 0.0) {
        return Err(Error::InvalidConfig(
            "lambda must be finite and >= 0".to_owned(),
        ));
    }
    if cfg.mini_batch_size == 0 {
        return Err(Error::InvalidConfig(
            "mini batch size must be > 0".to_owned(),
        ));
    }
    cfg.optimizer.validate()?;

    let mut sizes = Vec::with_capacity(cfg.hidden_layers.len() + 2);
    sizes.push(data.num_features());
    sizes.extend_from_slice(&cfg.hidden_layers);
    sizes.push(1);

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut net = Net::init_with_rng(&sizes, &mut rng)?;
    let mut state = cfg.optimizer.state(&net)?;
    let mut grads = net.gradients();

    let lambda = match cfg.regularization {
        Regularization::L2 => cfg.lambda,
        Regularization::None => 0.0,
    };

    debug!(?sizes, optimizer = ?cfg.optimizer, "training start");

    let mut epoch_costs = Vec::with_capacity(cfg.epochs);
    for epoch in 0..cfg.epochs {
        let batches = MiniBatches::new(
            data.features(),
            data.labels(),
            cfg.mini_batch_size,
            &mut rng,
        )?;

        let mut total = 0.0_f64;
        let mut steps = 0_usize;
        for (xb, yb) in batches {
            if xb.cols() == 0 {
                return Err(Error::Numeric(format!(
                    "epoch {epoch} produced a zero-width mini-batch \
                     ({} examples split by {})",
                    data.num_examples(),
                    cfg.mini_batch_size
                )));
            }

            let acts = net.forward(xb);
            let cost = match cfg.regularization {
                Regularization::L2 => bce_with_l2(acts.output(), &yb, &net, cfg.lambda),
                Regularization::None => bce(acts.output(), &yb),
            };
            if !cost.is_finite() {
                return Err(Error::Numeric(format!(
                    "cost became non-finite ({cost}) at epoch {epoch}"
                )));
            }
            total += cost;
            steps += 1;

            net.backward(&acts, &yb, lambda, &mut grads);
            state.step(&mut net, &grads, cfg.learning_rate);
        }

        let avg = total / steps as f64;
        debug!(epoch, cost = avg, "epoch complete");
        epoch_costs.push(avg);
    }

    Ok(TrainReport { net, epoch_costs })
}
