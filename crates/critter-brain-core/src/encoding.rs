//! Percept → network input vector.
//!
//! Layout (`PERCEPT_LEN` = 10):
//! direction(1) + front/back/left/right cells(4) + threat flags(4) + hop counter(1)

use serde::{Deserialize, Serialize};

pub const PERCEPT_LEN: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// Contents of a cell next to the critter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Neighbor {
    Wall,
    Empty,
    /// A critter of the same kind.
    Same,
    /// A critter of another kind.
    Other,
}

/// What a critter observes at one decision point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percept {
    pub direction: Direction,
    pub front: Neighbor,
    pub back: Neighbor,
    pub left: Neighbor,
    pub right: Neighbor,
    pub front_threat: bool,
    pub back_threat: bool,
    pub left_threat: bool,
    pub right_threat: bool,
}

// East appears twice and West not at all; encodings depend on this order.
pub const DIRECTION_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::East,
];

// Other is deliberately absent.
pub const NEIGHBOR_ORDER: [Neighbor; 3] = [Neighbor::Wall, Neighbor::Empty, Neighbor::Same];

/// Encode a categorical value as `(i + 1) / n`, `i` being its slot in
/// `ordering`.
///
/// A value listed more than once takes its last slot. A value not listed at
/// all takes the final slot's value (`1.0`). An empty ordering encodes as `0.0`.
pub fn encode_category<T: PartialEq>(ordering: &[T], current: &T) -> f64 {
    let increment = 1.0 / ordering.len() as f64;
    let mut running = 0.0;
    let mut encoded = None;
    for item in ordering {
        running += increment;
        if item == current {
            encoded = Some(running);
        }
    }
    encoded.unwrap_or(running)
}

pub fn encode_flag(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

pub fn encode_percept(percept: &Percept, hops: u32) -> [f64; PERCEPT_LEN] {
    [
        encode_category(&DIRECTION_ORDER, &percept.direction),
        encode_category(&NEIGHBOR_ORDER, &percept.front),
        encode_category(&NEIGHBOR_ORDER, &percept.back),
        encode_category(&NEIGHBOR_ORDER, &percept.left),
        encode_category(&NEIGHBOR_ORDER, &percept.right),
        encode_flag(percept.front_threat),
        encode_flag(percept.back_threat),
        encode_flag(percept.left_threat),
        encode_flag(percept.right_threat),
        f64::from(hops),
    ]
}
