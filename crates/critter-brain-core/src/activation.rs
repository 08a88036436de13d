use crate::nn::NetworkError;

/// Inverted logistic: `1 / (1 + e^x)`.
///
/// Large positive sums drive the result toward 0 and large negative sums
/// toward 1, the opposite of the usual sigmoid. The decoders' thresholds are
/// calibrated against this curve, so the exponent is not negated.
#[inline]
pub fn activation(x: f64) -> f64 {
    1.0 / (1.0 + x.exp())
}

/// Output of a single neuron: the dot product of `weights` and `input`
/// squashed through [`activation`].
pub fn neuron_output(weights: &[f64], input: &[f64]) -> Result<f64, NetworkError> {
    if weights.len() != input.len() {
        return Err(NetworkError::DimensionMismatch {
            weights: weights.len(),
            input: input.len(),
        });
    }
    let sum: f64 = weights.iter().zip(input).map(|(w, x)| w * x).sum();
    Ok(activation(sum))
}
