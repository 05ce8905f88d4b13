use crate::math::matrix::Matrix;

/// Per-transition gradients produced by one backward pass.
///
/// `weights[l]` and `biases[l]` are shaped exactly like the parameters of
/// transition `l`.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Vec<f64>>,
}

impl Gradients {
    /// True when every gradient has the shape of the parameter it belongs to.
    pub fn matches(&self, weights: &[Matrix], biases: &[Vec<f64>]) -> bool {
        self.weights.len() == weights.len()
            && self.biases.len() == biases.len()
            && self
                .weights
                .iter()
                .zip(weights)
                .all(|(g, w)| g.shape() == w.shape())
            && self
                .biases
                .iter()
                .zip(biases)
                .all(|(g, b)| g.len() == b.len())
    }
}
