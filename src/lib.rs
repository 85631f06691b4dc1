//! A small from-scratch feed-forward network trainer for binary classification.
//!
//! `sigmoid-net` implements the full training stack by hand: dense forward
//! propagation through sigmoid layers, reverse-mode differentiation, and four
//! gradient-update strategies (plain descent, momentum, RMSProp, Adam) behind
//! one tagged state type. It is designed to be easy to read; the heavy dense
//! products go through a single small gemm kernel.
//!
//! # Design goals
//!
//! - Clear contracts: shapes are explicit and validated at the API boundary.
//! - Deterministic runs: initialization and shuffling are seeded.
//! - Practical training loop: [`train()`] supports mini-batches, L2
//!   regularization, and the four optimizers.
//!
//! # Panics vs `Result`
//!
//! This crate intentionally exposes two layers of API:
//!
//! - Low-level hot path (panics on misuse): [`Net::forward`],
//!   [`Net::backward`], the cost helpers in [`cost`]. Shape mismatches are
//!   treated as programmer error and will panic via `assert!`.
//! - High-level entry points (shape-checked): [`Dataset::new`], [`train()`],
//!   [`predict()`], [`accuracy`]. These validate inputs and return [`Result`].
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - Examples are *columns*: a feature batch is `(num_features, batch_size)`
//!   and a label batch is `(1, batch_size)` with entries in `{0, 1}`.
//! - Layer weights have shape `(out_dim, in_dim)`; biases are `(out_dim, 1)`
//!   columns broadcast over the batch.
//!
//! # Quick start
//!
//! ```rust
//! use sigmoid_net::{accuracy, predict, train, Dataset, Mat, TrainConfig};
//!
//! # fn main() -> sigmoid_net::Result<()> {
//! // One feature; the label marks the sign.
//! let xs = vec![-4.0, -3.0, -2.0, -1.0, 1.0, 2.0, 3.0];
//! let ys: Vec<f64> = xs.iter().map(|&x| f64::from(x > 0.0)).collect();
//! let data = Dataset::new(Mat::from_rows(&[xs])?, Mat::from_rows(&[ys])?)?;
//!
//! let report = train(
//!     &data,
//!     &TrainConfig {
//!         epochs: 200,
//!         learning_rate: 0.5,
//!         mini_batch_size: 3,
//!         seed: 1,
//!         ..TrainConfig::default()
//!     },
//! )?;
//!
//! let pred = predict(&report.net, data.features())?;
//! assert!(accuracy(&pred, data.labels())? >= 0.8);
//! assert!(report.epoch_costs[199] < report.epoch_costs[0]);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod backward;
pub mod batch;
pub mod cost;
pub mod data;
pub mod error;
pub mod forward;
pub mod mat;
pub(crate) mod matmul;
pub mod net;
pub mod optim;
pub mod predict;
pub mod train;

pub use batch::MiniBatches;
pub use data::Dataset;
pub use error::{Error, Result};
pub use forward::Activations;
pub use mat::Mat;
pub use net::{Gradients, Layer, Net};
pub use optim::{Optimizer, OptimizerState};
pub use predict::{accuracy, predict};
pub use train::{train, Regularization, TrainConfig, TrainReport};
