pub mod activation;
pub mod config;
pub mod critter;
pub mod decoding;
pub mod encoding;
pub mod nn;

pub use config::{ConfigError, LayerUpdate, NetworkConfig};
pub use critter::Critter;
pub use decoding::{Action, DecodeError, ThresholdDecoder};
pub use encoding::{Direction, Neighbor, Percept};
pub use nn::{ForwardTrace, Network, NetworkError};
