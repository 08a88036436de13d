//! Minimal PyO3 module exposing critter-brain-core to Python.

use critter_brain_core::activation;
use critter_brain_core::config::{DEFAULT_HIDDEN_SIZE, DEFAULT_INPUT_SIZE, MAX_WEIGHT};
use critter_brain_core::decoding::decode_action;
use critter_brain_core::{LayerUpdate, Network};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pyfunction(name = "activation")]
fn py_activation(x: f64) -> f64 {
    activation::activation(x)
}

/// Index of the equal-width bucket `output` falls into among `n` buckets.
#[pyfunction(name = "decode_action")]
fn py_decode_action(output: f64, n: usize) -> PyResult<usize> {
    let buckets: Vec<usize> = (0..n).collect();
    decode_action(output, &buckets).ok_or_else(|| PyValueError::new_err("n must be positive"))
}

#[pyclass(name = "Network", frozen)]
struct PyNetwork {
    inner: Network,
}

#[pymethods]
impl PyNetwork {
    #[new]
    #[pyo3(signature = (input_size = DEFAULT_INPUT_SIZE, hidden_size = DEFAULT_HIDDEN_SIZE, max_weight = MAX_WEIGHT, seed = 0, aliased = false))]
    fn new(
        input_size: usize,
        hidden_size: usize,
        max_weight: f64,
        seed: u64,
        aliased: bool,
    ) -> PyResult<Self> {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let layer_update = if aliased {
            LayerUpdate::Aliased
        } else {
            LayerUpdate::DoubleBuffered
        };
        let inner = Network::new(input_size, hidden_size, max_weight, &mut rng)
            .map_err(|e| PyValueError::new_err(e.to_string()))?
            .with_layer_update(layer_update);
        Ok(Self { inner })
    }

    fn fire(&self, input: Vec<f64>) -> PyResult<f64> {
        self.inner
            .fire(&input)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Hidden vectors of one forward pass, input layer first.
    fn trace(&self, input: Vec<f64>) -> PyResult<(Vec<Vec<f64>>, f64)> {
        let trace = self
            .inner
            .trace(&input)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((trace.layers, trace.output))
    }

    #[getter]
    fn input_size(&self) -> usize {
        self.inner.input_size()
    }

    #[getter]
    fn hidden_size(&self) -> usize {
        self.inner.hidden_size()
    }

    #[getter]
    fn output_weights(&self) -> Vec<f64> {
        self.inner.output_weights().to_vec()
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(py_activation, m)?)?;
    m.add_function(wrap_pyfunction!(py_decode_action, m)?)?;
    m.add_class::<PyNetwork>()?;
    Ok(())
}
