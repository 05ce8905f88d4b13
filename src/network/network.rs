use std::sync::atomic::{AtomicU64, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use tracing::debug;

use crate::activation::sigmoid::{sigmoid_prime_vec, sigmoid_vec};
use crate::data::sample::Sample;
use crate::error::{NetError, Result};
use crate::eval::{self, Evaluation};
use crate::loss::mse::MseLoss;
use crate::math::matrix::{hadamard, Matrix};
use crate::network::cache::ForwardCache;
use crate::network::gradients::Gradients;
use crate::train::{self, EpochStats, TrainConfig};

/// Fully-connected sigmoid network.
///
/// Owns one weight matrix and one bias vector per transition between
/// consecutive entries of `layer_sizes`. `weights[l]` has shape
/// `(layer_sizes[l + 1], layer_sizes[l])` and `biases[l]` has length
/// `layer_sizes[l + 1]`; the architecture never changes after construction.
///
/// Every instance carries an identity and a parameter generation. Forward
/// caches are stamped with both, so `backward` only accepts a cache taken
/// from this network since its parameters last changed.
#[derive(Debug)]
pub struct Network {
    layer_sizes: Vec<usize>,
    pub(crate) weights: Vec<Matrix>,
    pub(crate) biases: Vec<Vec<f64>>,
    id: u64,
    generation: u64,
}

static NEXT_NETWORK_ID: AtomicU64 = AtomicU64::new(0);

fn next_network_id() -> u64 {
    NEXT_NETWORK_ID.fetch_add(1, Ordering::Relaxed)
}

/// A clone is a separate network: caches taken from one are stale for the other.
impl Clone for Network {
    fn clone(&self) -> Self {
        Network {
            layer_sizes: self.layer_sizes.clone(),
            weights: self.weights.clone(),
            biases: self.biases.clone(),
            id: next_network_id(),
            generation: 0,
        }
    }
}

/// Networks compare equal when architecture and parameters are identical.
impl PartialEq for Network {
    fn eq(&self, other: &Self) -> bool {
        self.layer_sizes == other.layer_sizes
            && self.weights == other.weights
            && self.biases == other.biases
    }
}

impl Network {
    pub const DEFAULT_SEED: u64 = 1;

    /// Builds a network with parameters drawn using [`Network::DEFAULT_SEED`].
    pub fn new(layer_sizes: Vec<usize>) -> Result<Network> {
        Network::with_seed(layer_sizes, Network::DEFAULT_SEED)
    }

    /// Builds a network whose weights and biases are independent N(0, 1) draws.
    ///
    /// Draw order is: transition 0 weights (row-major), transition 0 biases,
    /// transition 1 weights, and so on, all from one RNG seeded with `seed`.
    /// The same `layer_sizes` and `seed` always give bit-identical parameters.
    pub fn with_seed(layer_sizes: Vec<usize>, seed: u64) -> Result<Network> {
        validate_layer_sizes(&layer_sizes)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);
        for pair in layer_sizes.windows(2) {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            weights.push(Matrix::standard_normal(fan_out, fan_in, &mut rng));
            biases.push((0..fan_out).map(|_| rng.sample(StandardNormal)).collect());
        }
        debug!(?layer_sizes, seed, "initialized network parameters");

        Ok(Network {
            layer_sizes,
            weights,
            biases,
            id: next_network_id(),
            generation: 0,
        })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Number of layer transitions (weight/bias pairs).
    pub fn transitions(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Vec<f64>] {
        &self.biases
    }

    /// Replaces every weight matrix and bias vector.
    ///
    /// The replacements must have exactly the shapes the architecture
    /// dictates; otherwise nothing is changed and `ShapeMismatch` is returned.
    /// A NaN or infinite value is rejected with `Config`.
    pub fn set_parameters(&mut self, weights: Vec<Matrix>, biases: Vec<Vec<f64>>) -> Result<()> {
        let expected = self.transitions();
        if weights.len() != expected || biases.len() != expected {
            return Err(NetError::ShapeMismatch(format!(
                "expected {} weight matrices and bias vectors, got {} and {}",
                expected,
                weights.len(),
                biases.len()
            )));
        }
        for (l, (w, b)) in weights.iter().zip(&biases).enumerate() {
            let want = (self.layer_sizes[l + 1], self.layer_sizes[l]);
            if w.shape() != want || !w.is_rectangular() {
                return Err(NetError::ShapeMismatch(format!(
                    "weights {} should be {}x{}, got {}x{}",
                    l, want.0, want.1, w.rows, w.cols
                )));
            }
            if b.len() != want.0 {
                return Err(NetError::ShapeMismatch(format!(
                    "biases {} should have length {}, got {}",
                    l,
                    want.0,
                    b.len()
                )));
            }
            if !w.data.iter().flatten().chain(b).all(|v| v.is_finite()) {
                return Err(NetError::Config(format!(
                    "transition {} holds a non-finite weight or bias",
                    l
                )));
            }
        }
        self.weights = weights;
        self.biases = biases;
        self.parameters_changed();
        Ok(())
    }

    /// Invalidates every forward cache taken before this call.
    pub(crate) fn parameters_changed(&mut self) {
        self.generation += 1;
    }

    /// Checks every sample's input and expected lengths against the architecture.
    pub(crate) fn check_samples(&self, samples: &[Sample]) -> Result<()> {
        let (n_in, n_out) = (self.input_size(), self.output_size());
        for (i, sample) in samples.iter().enumerate() {
            if sample.input.len() != n_in || sample.expected.len() != n_out {
                return Err(NetError::ShapeMismatch(format!(
                    "sample {} is {}->{}, network is {}->{}",
                    i,
                    sample.input.len(),
                    sample.expected.len(),
                    n_in,
                    n_out
                )));
            }
        }
        Ok(())
    }

    /// Forward pass; returns every pre-activation and activation for backprop.
    pub fn forward(&self, input: &[f64]) -> Result<ForwardCache> {
        if input.len() != self.input_size() {
            return Err(NetError::ShapeMismatch(format!(
                "input has length {}, network expects {}",
                input.len(),
                self.input_size()
            )));
        }

        let mut pre_activations = Vec::with_capacity(self.transitions());
        let mut activations = Vec::with_capacity(self.transitions() + 1);
        activations.push(input.to_vec());

        for (weights, biases) in self.weights.iter().zip(&self.biases) {
            let current = &activations[activations.len() - 1];
            let z: Vec<f64> = weights
                .dot_vec(current)
                .into_iter()
                .zip(biases)
                .map(|(wx, b)| wx + b)
                .collect();
            activations.push(sigmoid_vec(&z));
            pre_activations.push(z);
        }

        Ok(ForwardCache {
            pre_activations,
            activations,
            network_id: self.id,
            generation: self.generation,
        })
    }

    /// Output activations for one input, discarding the intermediate values.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward(input)?.into_output())
    }

    /// Mean squared error between an output vector and its target.
    ///
    /// # Panics
    /// If `output` and `expected` differ in length. Training and evaluation
    /// reject such samples with `ShapeMismatch` before computing any cost.
    pub fn calculate_cost(output: &[f64], expected: &[f64]) -> f64 {
        MseLoss::loss(output, expected)
    }

    /// Backpropagates `expected` through the values recorded by `cache`.
    ///
    /// Walks from the output transition back to the first one, producing a
    /// weight gradient and a bias gradient per transition with the same
    /// shapes as the parameters.
    ///
    /// The cache must come from this network's `forward` since its parameters
    /// last changed; any other cache is rejected with `StaleCache`.
    pub fn backward(&self, cache: ForwardCache, expected: &[f64]) -> Result<Gradients> {
        if cache.network_id != self.id {
            return Err(NetError::StaleCache(
                "cache was produced by a different network".to_owned(),
            ));
        }
        if cache.generation != self.generation {
            return Err(NetError::StaleCache(format!(
                "parameters changed since the forward pass (generation {} -> {})",
                cache.generation, self.generation
            )));
        }
        if cache.layer_sizes() != self.layer_sizes || cache.pre_activations.len() != self.transitions() {
            return Err(NetError::StaleCache(format!(
                "cache layers {:?}, network layers {:?}",
                cache.layer_sizes(),
                self.layer_sizes
            )));
        }
        if expected.len() != self.output_size() {
            return Err(NetError::ShapeMismatch(format!(
                "expected output has length {}, network produces {}",
                expected.len(),
                self.output_size()
            )));
        }

        let n = self.transitions();
        let mut weight_grads = vec![Matrix::default(); n];
        let mut bias_grads = vec![Vec::new(); n];

        // Output layer: δ = σ'(z_L) ⊙ 2(a_L - y)
        let error = MseLoss::derivative(cache.output(), expected);
        let mut delta = hadamard(&sigmoid_prime_vec(&cache.pre_activations[n - 1]), &error);
        weight_grads[n - 1] = Matrix::outer(&delta, &cache.activations[n - 1]);
        bias_grads[n - 1] = delta.clone();

        // Hidden layers: δ_l = (δ_{l+1} · W_{l+1}) ⊙ σ'(z_l)
        for l in (0..n - 1).rev() {
            let propagated = self.weights[l + 1].vec_dot(&delta);
            delta = hadamard(&propagated, &sigmoid_prime_vec(&cache.pre_activations[l]));
            weight_grads[l] = Matrix::outer(&delta, &cache.activations[l]);
            bias_grads[l] = delta.clone();
        }

        Ok(Gradients {
            weights: weight_grads,
            biases: bias_grads,
        })
    }

    /// Trains in place with per-sample SGD, shuffling with the default seed.
    ///
    /// See [`train::train_loop`] for the exact update order.
    pub fn train(
        &mut self,
        samples: &[Sample],
        epochs: usize,
        learning_rate: f64,
    ) -> Result<Vec<EpochStats>> {
        let config = TrainConfig::new(epochs, learning_rate);
        train::train_loop(self, samples, &config)
    }

    /// Classification accuracy over a held-out set.
    pub fn test(&self, samples: &[Sample]) -> Result<Evaluation> {
        eval::evaluate(self, samples)
    }
}

fn validate_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(NetError::Config(format!(
            "need at least an input and an output layer, got {} layer size(s)",
            layer_sizes.len()
        )));
    }
    if let Some(pos) = layer_sizes.iter().position(|&size| size == 0) {
        return Err(NetError::Config(format!("layer {} has size 0", pos)));
    }
    Ok(())
}
