use crate::math::matrix::sub_scaled;
use crate::network::gradients::Gradients;
use crate::network::network::Network;

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update to every transition: `p -= lr * grad`.
    pub fn step(&self, network: &mut Network, gradients: &Gradients) {
        debug_assert!(gradients.matches(&network.weights, &network.biases));
        for (weights, grad) in network.weights.iter_mut().zip(&gradients.weights) {
            weights.scaled_sub_assign(grad, self.learning_rate);
        }
        for (biases, grad) in network.biases.iter_mut().zip(&gradients.biases) {
            sub_scaled(biases, grad, self.learning_rate);
        }
        network.parameters_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn step_moves_parameters_against_the_gradient() {
        let mut net = Network::new(vec![2, 2]).unwrap();
        let before = net.clone();
        let cache = net.forward(&[1.0, 0.0]).unwrap();
        let grads = net.backward(cache, &[1.0, 0.0]).unwrap();

        Sgd::new(0.5).step(&mut net, &grads);

        for i in 0..2 {
            assert_relative_eq!(net.biases()[0][i], before.biases()[0][i] - 0.5 * grads.biases[0][i]);
            for j in 0..2 {
                assert_relative_eq!(
                    net.weights()[0].data[i][j],
                    before.weights()[0].data[i][j] - 0.5 * grads.weights[0].data[i][j]
                );
            }
        }
    }

    #[test]
    fn step_invalidates_earlier_caches() {
        let mut net = Network::new(vec![2, 2]).unwrap();
        let first = net.forward(&[1.0, 0.0]).unwrap();
        let second = net.forward(&[1.0, 0.0]).unwrap();
        let grads = net.backward(first, &[1.0, 0.0]).unwrap();

        Sgd::new(0.1).step(&mut net, &grads);

        assert!(matches!(
            net.backward(second, &[1.0, 0.0]),
            Err(crate::error::NetError::StaleCache(_))
        ));
    }
}
