use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::data::sample::Sample;
use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` in place with per-sample SGD and returns one
/// `EpochStats` per epoch.
///
/// The shuffle RNG is seeded from `config.seed` once, before the first
/// epoch. Every epoch draws a fresh permutation of `0..samples.len()` from
/// it, so epoch `k`'s order depends on the state left by epoch `k - 1`, and
/// re-running with the same seed reproduces the whole sequence.
///
/// Within an epoch each sample is forwarded, its cost accumulated, its
/// gradients backpropagated and immediately applied; later samples see the
/// parameters already updated by earlier ones.
///
/// # Errors
/// - `Config` if `config` is invalid or `samples` is empty
/// - `ShapeMismatch` if any sample does not fit the network; this is checked
///   for the whole dataset before the first update
pub fn train_loop(
    network: &mut Network,
    samples: &[Sample],
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    if samples.is_empty() {
        return Err(NetError::Config("training set is empty".into()));
    }
    network.check_samples(samples)?;

    let optimizer = Sgd::new(config.learning_rate);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut indices: Vec<usize> = (0..samples.len()).collect();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        indices.shuffle(&mut rng);
        let train_loss = run_one_epoch(network, samples, &indices, &optimizer)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            epoch = stats.epoch,
            total = stats.total_epochs,
            avg_cost = stats.train_loss,
            elapsed_ms = stats.elapsed_ms,
            "epoch complete"
        );
        history.push(stats);
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One pass over `samples` in the order given by `order`.
/// Returns the mean cost over all samples.
fn run_one_epoch(
    network: &mut Network,
    samples: &[Sample],
    order: &[usize],
    optimizer: &Sgd,
) -> Result<f64> {
    let mut total_cost = 0.0;

    for &idx in order {
        let sample = &samples[idx];

        let cache = network.forward(&sample.input)?;
        total_cost += Network::calculate_cost(cache.output(), &sample.expected);

        let gradients = network.backward(cache, &sample.expected)?;
        optimizer.step(network, &gradients);
    }

    Ok(total_cost / samples.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::average_cost;

    /// Logical AND with a one-hot [false, true] target; linearly separable.
    fn and_samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![0.0, 0.0], vec![1.0, 0.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0, 0.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0, 0.0]),
            Sample::new(vec![1.0, 1.0], vec![0.0, 1.0]),
        ]
    }

    #[test]
    fn one_epoch_lowers_average_cost() {
        let samples = and_samples();
        let mut net = Network::with_seed(vec![2, 3, 2], 1).unwrap();
        let before = average_cost(&net, &samples).unwrap();

        let history = train_loop(&mut net, &samples, &TrainConfig::new(1, 0.1)).unwrap();

        let after = average_cost(&net, &samples).unwrap();
        assert_eq!(history.len(), 1);
        assert!(after < before, "cost went from {} to {}", before, after);
    }

    #[test]
    fn same_seed_reproduces_training() {
        let samples = and_samples();
        let config = TrainConfig::new(3, 0.5).with_seed(17);

        let mut a = Network::with_seed(vec![2, 3, 2], 4).unwrap();
        let mut b = Network::with_seed(vec![2, 3, 2], 4).unwrap();
        let ha = train_loop(&mut a, &samples, &config).unwrap();
        let hb = train_loop(&mut b, &samples, &config).unwrap();

        assert_eq!(a, b);
        let la: Vec<f64> = ha.iter().map(|s| s.train_loss).collect();
        let lb: Vec<f64> = hb.iter().map(|s| s.train_loss).collect();
        assert_eq!(la, lb);
    }

    #[test]
    fn many_epochs_fit_the_training_set() {
        let samples = and_samples();
        let mut net = Network::with_seed(vec![2, 3, 2], 1).unwrap();
        let history = train_loop(&mut net, &samples, &TrainConfig::new(2000, 0.5)).unwrap();

        assert_eq!(history.len(), 2000);
        assert_eq!(history[1999].epoch, 2000);
        assert!(history[1999].train_loss < history[0].train_loss);
        assert_eq!(net.test(&samples).unwrap().correct, 4);
    }

    #[test]
    fn rejects_empty_dataset() {
        let mut net = Network::new(vec![2, 2]).unwrap();
        assert!(matches!(
            train_loop(&mut net, &[], &TrainConfig::default()),
            Err(NetError::Config(_))
        ));
    }

    #[test]
    fn mismatched_sample_fails_before_any_update() {
        let mut samples = and_samples();
        samples.push(Sample::new(vec![1.0], vec![1.0, 0.0]));
        let mut net = Network::new(vec![2, 3, 2]).unwrap();
        let before = net.clone();

        let result = train_loop(&mut net, &samples, &TrainConfig::default());

        assert!(matches!(result, Err(NetError::ShapeMismatch(_))));
        assert_eq!(net, before);
    }
}
