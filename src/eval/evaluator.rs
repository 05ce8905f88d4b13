use std::fmt;

use tracing::warn;

use crate::data::sample::{argmax, Sample};
use crate::error::Result;
use crate::network::network::Network;

/// Outcome of classifying a held-out set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// Share of correctly classified samples as a percentage in `[0, 100]`.
    /// An empty set scores `0.0`.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}% ({}/{})", self.accuracy(), self.correct, self.total)
    }
}

/// Forwards every sample and counts argmax(output) == argmax(expected).
///
/// Every sample must match the network's input and output sizes;
/// otherwise nothing is scored and `ShapeMismatch` is returned.
pub fn evaluate(network: &Network, samples: &[Sample]) -> Result<Evaluation> {
    if samples.is_empty() {
        warn!("evaluating on an empty set");
    }
    network.check_samples(samples)?;
    let mut correct = 0usize;
    for sample in samples {
        let output = network.predict(&sample.input)?;
        if argmax(&output) == argmax(&sample.expected) {
            correct += 1;
        }
    }
    Ok(Evaluation {
        correct,
        total: samples.len(),
    })
}

/// Mean cost over a dataset without touching the parameters.
pub fn average_cost(network: &Network, samples: &[Sample]) -> Result<f64> {
    let n = samples.len();
    if n == 0 {
        return Ok(0.0);
    }
    network.check_samples(samples)?;
    let mut total = 0.0;
    for sample in samples {
        let output = network.predict(&sample.input)?;
        total += Network::calculate_cost(&output, &sample.expected);
    }
    Ok(total / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::one_hot;
    use crate::error::NetError;
    use crate::math::matrix::Matrix;
    use approx::assert_relative_eq;

    /// A [3, 3] network that maps one-hot class k to an output saturated at k.
    fn confident_network() -> Network {
        let mut net = Network::new(vec![3, 3]).unwrap();
        let weights = Matrix::from_data(vec![
            vec![20.0, 0.0, 0.0],
            vec![0.0, 20.0, 0.0],
            vec![0.0, 0.0, 20.0],
        ]);
        net.set_parameters(vec![weights], vec![vec![-10.0; 3]]).unwrap();
        net
    }

    fn held_out() -> Vec<Sample> {
        (0..3).map(|k| Sample::new(one_hot(k, 3), one_hot(k, 3))).collect()
    }

    #[test]
    fn confident_network_scores_full_marks() {
        let eval = evaluate(&confident_network(), &held_out()).unwrap();
        assert_eq!(eval.correct, 3);
        assert_eq!(eval.total, 3);
        assert_relative_eq!(eval.accuracy(), 100.0);
        assert_eq!(eval.to_string(), "100.00% (3/3)");
    }

    #[test]
    fn wrong_predictions_lower_accuracy() {
        let mut samples = held_out();
        samples[0].expected = one_hot(2, 3);
        let eval = evaluate(&confident_network(), &samples).unwrap();
        assert_eq!(eval.correct, 2);
        assert_relative_eq!(eval.accuracy(), 200.0 / 3.0);
    }

    #[test]
    fn empty_set_scores_zero() {
        let eval = evaluate(&confident_network(), &[]).unwrap();
        assert_eq!(eval, Evaluation { correct: 0, total: 0 });
        assert_eq!(eval.accuracy(), 0.0);
    }

    #[test]
    fn mislabeled_shapes_are_rejected() {
        let net = Network::new(vec![2, 3]).unwrap();
        let samples = [Sample::new(vec![0.0, 1.0], vec![1.0])];
        assert!(matches!(evaluate(&net, &samples), Err(NetError::ShapeMismatch(_))));
        assert!(matches!(average_cost(&net, &samples), Err(NetError::ShapeMismatch(_))));
    }

    #[test]
    fn average_cost_is_small_for_confident_network() {
        let cost = average_cost(&confident_network(), &held_out()).unwrap();
        assert!(cost >= 0.0 && cost < 1e-4);
    }
}
