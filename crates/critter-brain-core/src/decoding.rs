//! Network output → discrete action.
//!
//! `[0, 1]` is cut into ordered buckets by ascending upper boundaries. An
//! output maps to the first bucket whose boundary is `>= output`, so a value
//! sitting exactly on a boundary belongs to the lower bucket.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hop,
    Left,
    Right,
    Infect,
}

/// Upper boundaries used by the reference critter while its front cell is empty.
/// Not symmetric: the second cut sits slightly below 2/3.
pub const SMART_MOVE_BOUNDARIES: [f64; 3] = [0.3333333333, 0.66666, 1.0];
pub const TURN_BOUNDARIES: [f64; 2] = [0.5, 1.0];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("decoder needs at least one action")]
    NoActions,
    #[error("{actions} actions but {boundaries} boundaries")]
    LengthMismatch { actions: usize, boundaries: usize },
    #[error("boundaries must be ascending (index {index})")]
    Unsorted { index: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdDecoder<A> {
    actions: Vec<A>,
    boundaries: Vec<f64>,
}

impl<A: Copy> ThresholdDecoder<A> {
    /// Equal-width buckets: action `i` covers up to `(i + 1) / n`.
    pub fn even(actions: &[A]) -> Result<Self, DecodeError> {
        let n = actions.len() as f64;
        let boundaries = (1..=actions.len()).map(|i| i as f64 / n).collect();
        Self::with_boundaries(actions, boundaries)
    }

    pub fn with_boundaries(actions: &[A], boundaries: Vec<f64>) -> Result<Self, DecodeError> {
        if actions.is_empty() {
            return Err(DecodeError::NoActions);
        }
        if actions.len() != boundaries.len() {
            return Err(DecodeError::LengthMismatch {
                actions: actions.len(),
                boundaries: boundaries.len(),
            });
        }
        // NaN boundaries fail the comparison too
        if let Some(index) = boundaries
            .windows(2)
            .position(|pair| !(pair[0] <= pair[1]))
        {
            return Err(DecodeError::Unsorted { index: index + 1 });
        }
        Ok(Self {
            actions: actions.to_vec(),
            boundaries,
        })
    }

    /// Outputs above every boundary, and NaN, fall to the last action.
    pub fn decode(&self, output: f64) -> A {
        let index = self
            .boundaries
            .iter()
            .position(|&bound| output <= bound)
            .unwrap_or(self.actions.len() - 1);
        self.actions[index]
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }
}

impl ThresholdDecoder<Action> {
    /// Hop / turn left / turn right, with the reference's literal cut points.
    pub fn smart_move() -> Self {
        Self {
            actions: vec![Action::Hop, Action::Left, Action::Right],
            boundaries: SMART_MOVE_BOUNDARIES.to_vec(),
        }
    }

    /// Left below or at one half, right above.
    pub fn turn() -> Self {
        Self {
            actions: vec![Action::Left, Action::Right],
            boundaries: TURN_BOUNDARIES.to_vec(),
        }
    }
}

/// Decode against equal-width buckets over `actions`. `None` when `actions`
/// is empty.
pub fn decode_action<A: Copy>(output: f64, actions: &[A]) -> Option<A> {
    ThresholdDecoder::even(actions)
        .ok()
        .map(|decoder| decoder.decode(output))
}
