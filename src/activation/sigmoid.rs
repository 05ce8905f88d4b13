/// Logistic sigmoid `1 / (1 + e^-x)`.
///
/// For very negative `x`, `e^-x` overflows to `+inf`. IEEE-754 arithmetic
/// does not trap on that, and `1 / (1 + inf)` is exactly `0.0`, the correct
/// limit, so no clipping is applied to the input.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid, `s(x) * (1 - s(x))`.
pub fn sigmoid_prime(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

/// Element-wise `sigmoid` over a vector.
pub fn sigmoid_vec(z: &[f64]) -> Vec<f64> {
    z.iter().map(|&x| sigmoid(x)).collect()
}

/// Element-wise `sigmoid_prime` over a vector.
pub fn sigmoid_prime_vec(z: &[f64]) -> Vec<f64> {
    z.iter().map(|&x| sigmoid_prime(x)).collect()
}
