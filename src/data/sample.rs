/// One training or evaluation example: a flat input vector and its
/// one-hot target.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, expected: Vec<f64>) -> Sample {
        Sample { input, expected }
    }
}

/// One-hot vector of length `n_classes` with a `1.0` at `class`.
///
/// # Panics
/// Panics if `class >= n_classes`.
pub fn one_hot(class: usize, n_classes: usize) -> Vec<f64> {
    assert!(class < n_classes, "class {} out of range for {} classes", class, n_classes);
    let mut v = vec![0.0; n_classes];
    v[class] = 1.0;
    v
}

/// Index of the largest value; the first one wins on ties, `0` for an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best), (i, &x)| {
            if x > best { (i, x) } else { (best_i, best) }
        })
        .0
}
