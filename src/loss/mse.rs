pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    ///
    /// Panics if the slices differ in length.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        assert_eq!(predicted.len(), expected.len(), "Vectors are of incorrect sizes");
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output gradient used by backprop: 2·(predicted - expected)
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        assert_eq!(predicted.len(), expected.len(), "Vectors are of incorrect sizes");
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| 2.0 * (a - b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn loss_is_mean_of_squares() {
        assert_relative_eq!(MseLoss::loss(&[1.0, 0.0, 0.5], &[0.0, 0.0, 1.0]), 1.25 / 3.0);
    }

    #[test]
    fn loss_is_zero_only_for_exact_match() {
        assert_eq!(MseLoss::loss(&[0.2, 0.8], &[0.2, 0.8]), 0.0);
        assert!(MseLoss::loss(&[0.2, 0.8], &[0.2, 0.8 + 1e-9]) > 0.0);
    }

    #[test]
    fn loss_is_never_negative() {
        for (p, e) in [(-3.0, 2.0), (0.0, 0.0), (1.5, -0.25)] {
            assert!(MseLoss::loss(&[p], &[e]) >= 0.0);
        }
    }

    #[test]
    #[should_panic(expected = "Vectors are of incorrect sizes")]
    fn loss_panics_on_length_mismatch() {
        MseLoss::loss(&[0.5, 0.5], &[1.0]);
    }

    #[test]
    fn derivative_doubles_the_error() {
        assert_eq!(MseLoss::derivative(&[0.75, 0.25], &[1.0, 0.0]), vec![-0.5, 0.5]);
    }
}
