//! The parameter store.
//!
//! A [`Net`] is an ordered sequence of dense layers. Layer `i` (1-based in the
//! math, 0-based in the `Vec`) holds a weight matrix of shape
//! `(out_dim, in_dim)` and a bias column of shape `(out_dim, 1)`. The sizes
//! list `[n_0, .., n_L]` that built the net is recoverable via [`Net::sizes`]
//! and is immutable for the lifetime of the net.
//!
//! Weights are initialized element-wise from a zero-mean Gaussian with
//! standard deviation `sqrt(1 / in_dim)` (variance scaling suited to sigmoid
//! activations); biases start at zero.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::mat::Mat;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Layer {
    weights: Mat,
    biases: Mat,
}

impl Layer {
    /// Build a layer from explicit parameters.
    ///
    /// `weights` is `(out_dim, in_dim)`; `biases` must be `(out_dim, 1)`.
    pub fn new(weights: Mat, biases: Mat) -> Result<Self> {
        if biases.shape() != (weights.rows(), 1) {
            return Err(Error::InvalidShape(format!(
                "biases shape {:?} does not match weights with {} outputs",
                biases.shape(),
                weights.rows()
            )));
        }
        Ok(Self { weights, biases })
    }

    fn new_with_rng<R: Rng + ?Sized>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let std_dev = (1.0 / in_dim as f64).sqrt();
        let normal = Normal::new(0.0, std_dev).expect("std dev is finite and positive");

        let mut weights = Mat::zeros(out_dim, in_dim);
        for w in weights.data_mut() {
            *w = normal.sample(rng);
        }
        Self {
            weights,
            biases: Mat::zeros(out_dim, 1),
        }
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.weights.cols()
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.weights.rows()
    }

    #[inline]
    pub fn weights(&self) -> &Mat {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &Mat {
        &self.biases
    }

    #[inline]
    pub fn weights_mut(&mut self) -> &mut Mat {
        &mut self.weights
    }

    #[inline]
    pub fn biases_mut(&mut self) -> &mut Mat {
        &mut self.biases
    }
}

#[derive(Debug, Clone)]
pub struct Net {
    layers: Vec<Layer>,
}

impl Net {
    /// Initialize a net for the sizes list `[n_0, .., n_L]` using a
    /// deterministic seed.
    pub fn init_with_seed(sizes: &[usize], seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::init_with_rng(sizes, &mut rng)
    }

    /// Initialize a net using the provided RNG.
    pub fn init_with_rng<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(Error::InvalidConfig(
                "sizes must include input and output dims".to_owned(),
            ));
        }
        if sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "all layer sizes must be > 0".to_owned(),
            ));
        }

        let mut layers = Vec::with_capacity(sizes.len() - 1);
        for w in sizes.windows(2) {
            layers.push(Layer::new_with_rng(w[0], w[1], rng));
        }
        Ok(Self { layers })
    }

    /// Build a net from pre-constructed layers.
    ///
    /// Adjacent layers must chain: each layer's `in_dim` equals the previous
    /// layer's `out_dim`.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::InvalidConfig(
                "net must have at least one layer".to_owned(),
            ));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[1].in_dim() != pair[0].out_dim() {
                return Err(Error::InvalidShape(format!(
                    "layer {} takes {} inputs but layer {i} produces {} outputs",
                    i + 1,
                    pair[1].in_dim(),
                    pair[0].out_dim()
                )));
            }
        }
        Ok(Self { layers })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layers
            .first()
            .expect("net must have at least one layer")
            .in_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers
            .last()
            .expect("net must have at least one layer")
            .out_dim()
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    /// The sizes list `[n_0, .., n_L]` this net was built for.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers.len() + 1);
        sizes.push(self.input_dim());
        for layer in &self.layers {
            sizes.push(layer.out_dim());
        }
        sizes
    }

    /// Allocate a zeroed gradient store matching this net's parameters.
    pub fn gradients(&self) -> Gradients {
        Gradients::new(self)
    }
}

/// Parameter gradients for a [`Net`] (overwrite semantics).
///
/// Allocate once via [`Net::gradients`] and reuse across training steps; each
/// backward pass fully overwrites the buffers.
#[derive(Debug, Clone)]
pub struct Gradients {
    d_weights: Vec<Mat>,
    d_biases: Vec<Mat>,
}

impl Gradients {
    pub fn new(net: &Net) -> Self {
        let mut d_weights = Vec::with_capacity(net.num_layers());
        let mut d_biases = Vec::with_capacity(net.num_layers());
        for layer in net.layers() {
            d_weights.push(Mat::zeros(layer.out_dim(), layer.in_dim()));
            d_biases.push(Mat::zeros(layer.out_dim(), 1));
        }
        Self {
            d_weights,
            d_biases,
        }
    }

    #[inline]
    pub fn d_weights(&self, layer_idx: usize) -> &Mat {
        &self.d_weights[layer_idx]
    }

    #[inline]
    pub fn d_biases(&self, layer_idx: usize) -> &Mat {
        &self.d_biases[layer_idx]
    }

    #[inline]
    pub fn d_weights_mut(&mut self, layer_idx: usize) -> &mut Mat {
        &mut self.d_weights[layer_idx]
    }

    #[inline]
    pub fn d_biases_mut(&mut self, layer_idx: usize) -> &mut Mat {
        &mut self.d_biases[layer_idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_produces_consistent_shapes() {
        for sizes in [vec![2, 1], vec![3, 4, 1], vec![5, 8, 8, 1]] {
            let net = Net::init_with_seed(&sizes, 0).unwrap();
            assert_eq!(net.num_layers(), sizes.len() - 1);
            assert_eq!(net.sizes(), sizes);
            for (i, layer) in net.layers().iter().enumerate() {
                assert_eq!(layer.weights().shape(), (sizes[i + 1], sizes[i]));
                assert_eq!(layer.biases().shape(), (sizes[i + 1], 1));
                assert!(layer.biases().data().iter().all(|&b| b == 0.0));
            }
        }
    }

    #[test]
    fn init_rejects_bad_sizes() {
        assert!(matches!(
            Net::init_with_seed(&[3], 0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Net::init_with_seed(&[3, 0, 1], 0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Net::init_with_seed(&[], 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeded_init_is_deterministic() {
        let a = Net::init_with_seed(&[4, 3, 1], 42).unwrap();
        let b = Net::init_with_seed(&[4, 3, 1], 42).unwrap();
        for i in 0..a.num_layers() {
            assert_eq!(a.layers()[i].weights(), b.layers()[i].weights());
        }
    }

    #[test]
    fn weight_scale_tracks_fan_in() {
        // With std dev sqrt(1/in_dim), the sample variance over a wide layer
        // should be near 1/in_dim.
        let net = Net::init_with_seed(&[100, 200, 1], 7).unwrap();
        let w = net.layers()[0].weights();
        let n = w.data().len() as f64;
        let mean = w.data().iter().sum::<f64>() / n;
        let var = w.data().iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        assert!((var - 0.01).abs() < 0.002, "sample variance {var}");
    }

    #[test]
    fn from_layers_rejects_mismatched_chain() {
        let a = Layer::new(Mat::zeros(3, 2), Mat::zeros(3, 1)).unwrap();
        let b = Layer::new(Mat::zeros(1, 4), Mat::zeros(1, 1)).unwrap();
        assert!(matches!(
            Net::from_layers(vec![a, b]),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn gradients_mirror_parameter_shapes() {
        let net = Net::init_with_seed(&[3, 4, 1], 0).unwrap();
        let grads = net.gradients();
        for i in 0..net.num_layers() {
            assert_eq!(
                grads.d_weights(i).shape(),
                net.layers()[i].weights().shape()
            );
            assert_eq!(grads.d_biases(i).shape(), net.layers()[i].biases().shape());
        }
    }
}
