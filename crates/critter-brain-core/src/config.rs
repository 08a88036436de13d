//! Network configuration.
//!
//! The defaults are the reference critter brain: ten percept inputs, eight
//! hidden units per layer and weights drawn below `1.4`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_INPUT_SIZE: usize = crate::encoding::PERCEPT_LEN;
pub const DEFAULT_HIDDEN_SIZE: usize = 8;
pub const MAX_WEIGHT: f64 = 1.4;

/// How the hidden-to-hidden stage carries activations between layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerUpdate {
    /// Each layer is computed in full from the previous one, then swapped in.
    #[default]
    DoubleBuffered,
    /// One scratch buffer is overwritten unit by unit while it is being read.
    /// Only the very first unit sees the input layer's activations; the
    /// output stage reads the scratch buffer. Reproduces the legacy critter
    /// brain exactly.
    Aliased,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub max_weight: f64,
    pub layer_update: LayerUpdate,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            hidden_size: DEFAULT_HIDDEN_SIZE,
            max_weight: MAX_WEIGHT,
            layer_update: LayerUpdate::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("input_size must be at least 1 (got {0})")]
    InputSize(usize),
    #[error("hidden_size must be at least 2 (got {0})")]
    HiddenSize(usize),
    #[error("max_weight must be finite and positive (got {0})")]
    MaxWeight(f64),
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_size < 1 {
            return Err(ConfigError::InputSize(self.input_size));
        }
        if self.hidden_size < 2 {
            return Err(ConfigError::HiddenSize(self.hidden_size));
        }
        if !self.max_weight.is_finite() || self.max_weight <= 0.0 {
            return Err(ConfigError::MaxWeight(self.max_weight));
        }
        Ok(())
    }

    /// Total number of weights a network built from this config draws.
    pub fn weight_count(&self) -> usize {
        let hidden_layers = self.hidden_size.saturating_sub(1);
        hidden_layers * self.hidden_size * self.hidden_size
            + self.hidden_size * self.input_size
            + self.hidden_size
    }
}
