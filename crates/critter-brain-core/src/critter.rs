use crate::config::NetworkConfig;
use crate::decoding::{Action, ThresholdDecoder};
use crate::encoding::{encode_percept, Neighbor, Percept, PERCEPT_LEN};
use crate::nn::{Network, NetworkError};
use rand::Rng;
use std::fmt;

/// An agent driven by its own [`Network`].
///
/// Infects whatever stands in front of it, asks the network whether to hop
/// or turn when the way is clear, and asks it which way to turn otherwise.
#[derive(Clone, Debug)]
pub struct Critter {
    id: u64,
    hops: u32,
    brain: Network,
    smart_move: ThresholdDecoder<Action>,
    turn: ThresholdDecoder<Action>,
}

impl Critter {
    /// The brain must take exactly `PERCEPT_LEN` inputs; the config is
    /// checked before any weight is drawn.
    pub fn new<R: Rng + ?Sized>(
        id: u64,
        config: &NetworkConfig,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        check_percept_width(config.input_size, config.hidden_size)?;
        Self::with_brain(id, Network::from_config(config, rng)?)
    }

    pub fn with_brain(id: u64, brain: Network) -> Result<Self, NetworkError> {
        check_percept_width(brain.input_size(), brain.hidden_size())?;
        Ok(Self {
            id,
            hops: 0,
            brain,
            smart_move: ThresholdDecoder::smart_move(),
            turn: ThresholdDecoder::turn(),
        })
    }

    pub fn get_move(&mut self, percept: &Percept) -> Result<Action, NetworkError> {
        match percept.front {
            Neighbor::Other => Ok(Action::Infect),
            Neighbor::Empty => {
                let output = self.think(percept)?;
                let action = self.smart_move.decode(output);
                if action == Action::Hop {
                    self.hops = self.hops.saturating_add(1);
                } else {
                    self.hops = 0;
                }
                Ok(action)
            }
            Neighbor::Wall | Neighbor::Same => {
                self.hops = 0;
                let output = self.think(percept)?;
                Ok(self.turn.decode(output))
            }
        }
    }

    fn think(&self, percept: &Percept) -> Result<f64, NetworkError> {
        let input = encode_percept(percept, self.hops);
        self.brain.fire(&input)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Consecutive hops since the last turn.
    pub fn hops(&self) -> u32 {
        self.hops
    }

    pub fn brain(&self) -> &Network {
        &self.brain
    }
}

fn check_percept_width(input_size: usize, hidden_size: usize) -> Result<(), NetworkError> {
    if input_size != PERCEPT_LEN {
        return Err(NetworkError::InvalidDimension {
            input_size,
            hidden_size,
        });
    }
    Ok(())
}

impl fmt::Display for Critter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
