/// Intermediate values recorded by one forward pass.
///
/// Returned by [`Network::forward`](crate::Network::forward) and consumed by
/// [`Network::backward`](crate::Network::backward). Because backward takes the
/// cache by value, every backward call is paired with exactly one forward
/// call on the sample being trained. The cache cannot be cloned, and it
/// records which network and parameter generation produced it.
#[derive(Debug)]
pub struct ForwardCache {
    /// `z = W·a + b` for every non-input layer.
    pub(crate) pre_activations: Vec<Vec<f64>>,
    /// `a` for every layer; `activations[0]` is the input itself.
    pub(crate) activations: Vec<Vec<f64>>,
    pub(crate) network_id: u64,
    pub(crate) generation: u64,
}

impl ForwardCache {
    /// Final activation vector (the network output).
    pub fn output(&self) -> &[f64] {
        self.activations.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_output(mut self) -> Vec<f64> {
        self.activations.pop().unwrap_or_default()
    }

    pub fn pre_activations(&self) -> &[Vec<f64>] {
        &self.pre_activations
    }

    pub fn activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    /// Layer sizes as seen by this cache, input first.
    pub(crate) fn layer_sizes(&self) -> Vec<usize> {
        self.activations.iter().map(Vec::len).collect()
    }
}
