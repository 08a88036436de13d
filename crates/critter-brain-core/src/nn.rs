//! Fully connected feedforward network used as a critter's brain.
//!
//! `input_size` inputs → `hidden_size` units, then `hidden_size - 2` further
//! hidden layers of the same width, then a single scalar output. Every unit
//! uses the inverted logistic from [`crate::activation`], so the output lies in
//! (0, 1). No biases. Weights are drawn once and never change.

use crate::activation::neuron_output;
use crate::config::{LayerUpdate, NetworkConfig};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("unsupported network dimensions: input_size {input_size}, hidden_size {hidden_size}")]
    InvalidDimension {
        input_size: usize,
        hidden_size: usize,
    },
    #[error("weight row has {weights} entries but input has {input}")]
    DimensionMismatch { weights: usize, input: usize },
    #[error("max_weight must be finite and positive (got {0})")]
    InvalidMaxWeight(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    input_size: usize,
    hidden_size: usize,
    // hidden_size × input_size
    input_weights: Vec<Vec<f64>>,
    // (hidden_size - 1) × hidden_size × hidden_size; layer 0 is never read
    hidden_weights: Vec<Vec<Vec<f64>>>,
    // hidden_size
    output_weights: Vec<f64>,
    layer_update: LayerUpdate,
}

/// Every activation vector produced by one forward pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardTrace {
    /// Hidden vectors in order; `layers[0]` is the input layer's output.
    /// In [`LayerUpdate::Aliased`] mode later entries are snapshots of the
    /// scratch buffer after each layer.
    pub layers: Vec<Vec<f64>>,
    pub output: f64,
}

impl Network {
    /// Draw a fresh network. Hidden weights are drawn first (layer, row,
    /// column), then input weights, then output weights.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        max_weight: f64,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        if input_size < 1 || hidden_size < 2 {
            return Err(NetworkError::InvalidDimension {
                input_size,
                hidden_size,
            });
        }
        if !max_weight.is_finite() || max_weight <= 0.0 {
            return Err(NetworkError::InvalidMaxWeight(max_weight));
        }

        let hidden_weights: Vec<Vec<Vec<f64>>> = (0..hidden_size - 1)
            .map(|_| uniform_matrix(rng, hidden_size, hidden_size, max_weight))
            .collect();
        let input_weights = uniform_matrix(rng, hidden_size, input_size, max_weight);
        let output_weights: Vec<f64> = (0..hidden_size).map(|_| rng.random::<f64>()).collect();

        tracing::debug!(input_size, hidden_size, max_weight, "network initialized");

        Ok(Self {
            input_size,
            hidden_size,
            input_weights,
            hidden_weights,
            output_weights,
            layer_update: LayerUpdate::default(),
        })
    }

    pub fn from_config<R: Rng + ?Sized>(
        config: &NetworkConfig,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let network = Self::new(config.input_size, config.hidden_size, config.max_weight, rng)?
            .with_layer_update(config.layer_update);
        tracing::debug!(layer_update = ?network.layer_update, "network configured");
        Ok(network)
    }

    /// Build a network from explicit weights. Shapes must match
    /// `hidden × input`, `(hidden - 1) × hidden × hidden` and `hidden`.
    pub fn from_weights(
        input_weights: Vec<Vec<f64>>,
        hidden_weights: Vec<Vec<Vec<f64>>>,
        output_weights: Vec<f64>,
    ) -> Result<Self, NetworkError> {
        let hidden_size = output_weights.len();
        let input_size = input_weights.first().map_or(0, Vec::len);
        if input_size < 1 || hidden_size < 2 {
            return Err(NetworkError::InvalidDimension {
                input_size,
                hidden_size,
            });
        }
        check_len(input_weights.len(), hidden_size)?;
        for row in &input_weights {
            check_len(row.len(), input_size)?;
        }
        check_len(hidden_weights.len(), hidden_size - 1)?;
        for layer in &hidden_weights {
            check_len(layer.len(), hidden_size)?;
            for row in layer {
                check_len(row.len(), hidden_size)?;
            }
        }

        Ok(Self {
            input_size,
            hidden_size,
            input_weights,
            hidden_weights,
            output_weights,
            layer_update: LayerUpdate::default(),
        })
    }

    pub fn with_layer_update(mut self, layer_update: LayerUpdate) -> Self {
        self.layer_update = layer_update;
        self
    }

    /// Forward pass. Returns a value in (0, 1).
    pub fn fire(&self, input: &[f64]) -> Result<f64, NetworkError> {
        self.propagate(input, None)
    }

    /// Forward pass that also returns every hidden vector.
    pub fn trace(&self, input: &[f64]) -> Result<ForwardTrace, NetworkError> {
        let mut layers = Vec::with_capacity(self.hidden_size - 1);
        let output = self.propagate(input, Some(&mut layers))?;
        Ok(ForwardTrace { layers, output })
    }

    fn propagate(
        &self,
        input: &[f64],
        mut record: Option<&mut Vec<Vec<f64>>>,
    ) -> Result<f64, NetworkError> {
        if input.len() != self.input_size {
            return Err(NetworkError::DimensionMismatch {
                weights: self.input_size,
                input: input.len(),
            });
        }

        let first = layer_output(&self.input_weights, input)?;
        if let Some(layers) = record.as_deref_mut() {
            layers.push(first.clone());
        }

        let last = match self.layer_update {
            LayerUpdate::DoubleBuffered => {
                let mut prev = first;
                for layer in &self.hidden_weights[1..] {
                    let next = layer_output(layer, &prev)?;
                    if let Some(layers) = record.as_deref_mut() {
                        layers.push(next.clone());
                    }
                    prev = next;
                }
                prev
            }
            LayerUpdate::Aliased => {
                let mut scratch = vec![0.0; self.hidden_size];
                let mut reading_first = true;
                for layer in &self.hidden_weights[1..] {
                    for (r, row) in layer.iter().enumerate() {
                        let source = if reading_first { &first } else { &scratch };
                        let value = neuron_output(row, source)?;
                        scratch[r] = value;
                        reading_first = false;
                    }
                    if let Some(layers) = record.as_deref_mut() {
                        layers.push(scratch.clone());
                    }
                }
                scratch
            }
        };

        let output = neuron_output(&self.output_weights, &last)?;
        tracing::trace!(output, "network fired");
        Ok(output)
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn layer_update(&self) -> LayerUpdate {
        self.layer_update
    }

    pub fn input_weights(&self) -> &[Vec<f64>] {
        &self.input_weights
    }

    pub fn hidden_weights(&self) -> &[Vec<Vec<f64>>] {
        &self.hidden_weights
    }

    pub fn output_weights(&self) -> &[f64] {
        &self.output_weights
    }
}

fn uniform_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    max_weight: f64,
) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|_| (0..cols).map(|_| rng.random_range(0.0..max_weight)).collect())
        .collect()
}

fn layer_output(rows: &[Vec<f64>], input: &[f64]) -> Result<Vec<f64>, NetworkError> {
    rows.iter().map(|row| neuron_output(row, input)).collect()
}

fn check_len(actual: usize, expected: usize) -> Result<(), NetworkError> {
    if actual != expected {
        return Err(NetworkError::DimensionMismatch {
            weights: actual,
            input: expected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation;
    use crate::config::MAX_WEIGHT;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;

    fn reference_network(seed: u64) -> Network {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        Network::new(10, 8, MAX_WEIGHT, &mut rng).unwrap()
    }

    /// 3 hidden units, one input; every first-layer unit reads 0.5.
    fn hand_built() -> Network {
        let input_weights = vec![vec![0.0]; 3];
        let hidden_weights = vec![
            vec![vec![9.0; 3]; 3],
            vec![
                vec![1.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
            ],
        ];
        Network::from_weights(input_weights, hidden_weights, vec![1.0, 1.0, 1.0]).unwrap()
    }

    #[test]
    fn reference_shapes_and_ranges() {
        let net = reference_network(42);
        assert_eq!(net.input_size(), 10);
        assert_eq!(net.hidden_size(), 8);
        assert_eq!(net.input_weights().len(), 8);
        assert!(net.input_weights().iter().all(|row| row.len() == 10));
        assert_eq!(net.hidden_weights().len(), 7);
        assert!(net
            .hidden_weights()
            .iter()
            .all(|layer| layer.len() == 8 && layer.iter().all(|row| row.len() == 8)));
        assert_eq!(net.output_weights().len(), 8);

        let in_range = |w: &f64| (0.0..MAX_WEIGHT).contains(w);
        assert!(net.input_weights().iter().flatten().all(in_range));
        assert!(net.hidden_weights().iter().flatten().flatten().all(in_range));
        assert!(net
            .output_weights()
            .iter()
            .all(|w| (0.0..1.0).contains(w)));
    }

    #[test]
    fn construction_is_deterministic_for_fixed_seed() {
        assert_eq!(reference_network(7), reference_network(7));
        assert_ne!(reference_network(7), reference_network(8));
    }

    #[test]
    fn rejects_invalid_dimensions() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert_eq!(
            Network::new(0, 8, MAX_WEIGHT, &mut rng).unwrap_err(),
            NetworkError::InvalidDimension {
                input_size: 0,
                hidden_size: 8
            }
        );
        assert_eq!(
            Network::new(10, 1, MAX_WEIGHT, &mut rng).unwrap_err(),
            NetworkError::InvalidDimension {
                input_size: 10,
                hidden_size: 1
            }
        );
    }

    #[test]
    fn rejects_invalid_max_weight() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert!(matches!(
            Network::new(10, 8, 0.0, &mut rng),
            Err(NetworkError::InvalidMaxWeight(_))
        ));
        assert!(matches!(
            Network::new(10, 8, f64::NAN, &mut rng),
            Err(NetworkError::InvalidMaxWeight(_))
        ));
    }

    #[test]
    fn fire_rejects_wrong_input_length() {
        let net = reference_network(1);
        assert_eq!(
            net.fire(&[0.0; 9]).unwrap_err(),
            NetworkError::DimensionMismatch {
                weights: 10,
                input: 9
            }
        );
    }

    #[test]
    fn fire_is_pure() {
        let net = reference_network(3);
        let before = net.clone();
        let input = [0.25, 0.5, 0.75, 1.0, 0.5, 1.0, 0.0, 0.0, 1.0, 3.0];
        let a = net.fire(&input).unwrap();
        let b = net.fire(&input).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        assert!(a > 0.0 && a < 1.0);
        assert_eq!(net, before);
    }

    #[test]
    fn fire_matches_trace_output() {
        for mode in [LayerUpdate::DoubleBuffered, LayerUpdate::Aliased] {
            let net = reference_network(11).with_layer_update(mode);
            let input = [0.5; 10];
            let trace = net.trace(&input).unwrap();
            assert_eq!(trace.output, net.fire(&input).unwrap());
            // input layer + hidden_size - 2 transitions
            assert_eq!(trace.layers.len(), 7);
        }
    }

    #[test]
    fn draws_hidden_then_input_then_output() {
        let net = reference_network(42);
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        for layer in net.hidden_weights() {
            for &w in layer.iter().flatten() {
                assert_eq!(w, rng.random_range(0.0..MAX_WEIGHT));
            }
        }
        for &w in net.input_weights().iter().flatten() {
            assert_eq!(w, rng.random_range(0.0..MAX_WEIGHT));
        }
        for &w in net.output_weights() {
            assert_eq!(w, rng.random::<f64>());
        }

        assert_eq!(net.hidden_weights()[0][0][0], 0.7371803726038832);
        assert_eq!(net.hidden_weights()[6][7][7], 0.6237924139311813);
        // first draw after the 7 * 8 * 8 hidden weights
        assert_eq!(net.input_weights()[0][0], 0.29676480953339535);
        assert_eq!(net.input_weights()[7][9], 0.03926597212926155);
        assert_eq!(net.output_weights()[0], 0.5422091976912522);
        assert_eq!(net.output_weights()[7], 0.6283137275001117);
    }

    #[test]
    fn seeded_zero_input_output_is_pinned() {
        let net = reference_network(42);
        let double_buffered = net.fire(&[0.0; 10]).unwrap();
        assert!((double_buffered - 0.1352907384200279).abs() < 1e-12);

        let aliased = net.with_layer_update(LayerUpdate::Aliased);
        let legacy = aliased.fire(&[0.0; 10]).unwrap();
        assert!((legacy - 0.22525068486837235).abs() < 1e-12);
    }

    #[test]
    fn zero_input_first_layer_is_one_half() {
        let net = reference_network(42);
        let trace = net.trace(&[0.0; 10]).unwrap();
        assert_eq!(trace.layers[0], vec![0.5; 8]);
    }

    #[test]
    fn double_buffered_trace_recomputes_by_hand() {
        let net = reference_network(42);
        let trace = net.trace(&[0.0; 10]).unwrap();

        let mut expected = vec![0.5; 8];
        for l in 1..7 {
            let hidden = &net.hidden_weights()[l];
            expected = (0..8)
                .map(|r| {
                    let sum: f64 = hidden[r].iter().zip(&expected).map(|(w, x)| w * x).sum();
                    activation(sum)
                })
                .collect();
            assert_eq!(trace.layers[l], expected, "layer {l}");
        }
        let sum: f64 = net
            .output_weights()
            .iter()
            .zip(&expected)
            .map(|(w, x)| w * x)
            .sum();
        assert_eq!(trace.output, activation(sum));
        assert!(trace.output > 0.0 && trace.output < 1.0);
    }

    #[test]
    fn aliased_matches_legacy_loop() {
        let net = reference_network(42).with_layer_update(LayerUpdate::Aliased);
        let input = [0.25, 0.5, 1.0, 0.333, 0.666, 1.0, 0.0, 1.0, 0.0, 2.0];

        let h = net.hidden_size();
        let prev: Vec<f64> = net
            .input_weights()
            .iter()
            .map(|row| neuron_output(row, &input).unwrap())
            .collect();
        let mut next = vec![0.0; h];
        let mut aliased = false;
        for l in 1..h - 1 {
            for r in 0..h {
                let source = if aliased { next.clone() } else { prev.clone() };
                next[r] = neuron_output(&net.hidden_weights()[l][r], &source).unwrap();
                aliased = true;
            }
        }
        let expected = neuron_output(net.output_weights(), &next).unwrap();

        assert_eq!(net.fire(&input).unwrap().to_bits(), expected.to_bits());
    }

    #[test]
    fn double_buffered_layer_reads_previous_layer_only() {
        let net = hand_built();
        let trace = net.trace(&[1.0]).unwrap();
        let a = activation(0.5);
        assert_eq!(trace.layers[1], vec![a, a, a]);
        assert_eq!(trace.output, activation(3.0 * a));
    }

    #[test]
    fn aliased_layer_reads_partially_overwritten_buffer() {
        let net = hand_built().with_layer_update(LayerUpdate::Aliased);
        let trace = net.trace(&[1.0]).unwrap();
        let s0 = activation(0.5);
        let s1 = activation(s0);
        let s2 = activation(s1);
        assert_eq!(trace.layers[1], vec![s0, s1, s2]);
        assert_eq!(trace.output, activation(s0 + s1 + s2));
        let double_buffered = net.with_layer_update(LayerUpdate::DoubleBuffered);
        assert_ne!(trace.output, double_buffered.fire(&[1.0]).unwrap());
    }

    #[test]
    fn two_hidden_units_skip_hidden_stage() {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let net = Network::new(3, 2, MAX_WEIGHT, &mut rng).unwrap();
        let input = [1.0, 0.5, 0.25];
        let trace = net.trace(&input).unwrap();
        assert_eq!(trace.layers.len(), 1);
        assert_eq!(
            trace.output,
            neuron_output(net.output_weights(), &trace.layers[0]).unwrap()
        );

        // The legacy loop never writes its scratch buffer, so the output
        // stage sees zeros whatever the input.
        let legacy = net.with_layer_update(LayerUpdate::Aliased);
        assert_eq!(legacy.fire(&input).unwrap(), 0.5);
    }

    #[test]
    fn from_weights_checks_shapes() {
        let err = Network::from_weights(
            vec![vec![0.0; 2]; 3],
            vec![vec![vec![0.0; 3]; 3]; 1],
            vec![0.0; 3],
        )
        .unwrap_err();
        assert_eq!(
            err,
            NetworkError::DimensionMismatch {
                weights: 1,
                input: 2
            }
        );

        let err = Network::from_weights(
            vec![vec![0.0; 2], vec![0.0; 1]],
            vec![vec![vec![0.0; 2]; 2]],
            vec![0.0; 2],
        )
        .unwrap_err();
        assert_eq!(
            err,
            NetworkError::DimensionMismatch {
                weights: 1,
                input: 2
            }
        );

        assert!(matches!(
            Network::from_weights(vec![], vec![], vec![1.0]),
            Err(NetworkError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn from_config_carries_layer_update() {
        let config = NetworkConfig {
            layer_update: LayerUpdate::Aliased,
            ..NetworkConfig::default()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(9);
        let net = Network::from_config(&config, &mut rng).unwrap();
        assert_eq!(net.layer_update(), LayerUpdate::Aliased);
        assert_eq!(net.input_size(), 10);
    }
}
