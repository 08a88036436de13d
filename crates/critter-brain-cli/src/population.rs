use critter_brain_core::encoding::{Direction, Neighbor, Percept};
use critter_brain_core::{Action, Critter, NetworkConfig, NetworkError};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use serde::Serialize;

const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];
const NEIGHBORS: [Neighbor; 4] = [
    Neighbor::Wall,
    Neighbor::Empty,
    Neighbor::Same,
    Neighbor::Other,
];

pub fn random_percept<R: Rng + ?Sized>(rng: &mut R) -> Percept {
    let mut neighbor = || NEIGHBORS[rng.random_range(0..NEIGHBORS.len())];
    let (front, back, left, right) = (neighbor(), neighbor(), neighbor(), neighbor());
    Percept {
        direction: DIRECTIONS[rng.random_range(0..DIRECTIONS.len())],
        front,
        back,
        left,
        right,
        front_threat: rng.random(),
        back_threat: rng.random(),
        left_threat: rng.random(),
        right_threat: rng.random(),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActionCounts {
    pub hop: u64,
    pub left: u64,
    pub right: u64,
    pub infect: u64,
}

impl ActionCounts {
    pub fn record(&mut self, action: Action) {
        match action {
            Action::Hop => self.hop += 1,
            Action::Left => self.left += 1,
            Action::Right => self.right += 1,
            Action::Infect => self.infect += 1,
        }
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.hop += other.hop;
        self.left += other.left;
        self.right += other.right;
        self.infect += other.infect;
        self
    }

    pub fn total(&self) -> u64 {
        self.hop + self.left + self.right + self.infect
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PopulationSummary {
    pub seed: u64,
    pub critters: usize,
    pub steps: usize,
    pub config: NetworkConfig,
    pub weights_per_critter: usize,
    pub actions: ActionCounts,
    pub longest_hop_streak: u32,
    /// Id of the critter that reached `longest_hop_streak` first.
    pub best_hopper: Option<u64>,
}

struct Member {
    critter: Critter,
    rng: ChaCha12Rng,
}

/// A set of critters, each with its own brain and its own percept stream.
pub struct Population {
    seed: u64,
    config: NetworkConfig,
    members: Vec<Member>,
}

impl Population {
    /// Ids run from 0; brains and percept streams are drawn from one
    /// generator seeded with `seed`, so results do not depend on threading.
    pub fn new(config: NetworkConfig, critters: usize, seed: u64) -> Result<Self, NetworkError> {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let mut members = Vec::with_capacity(critters);
        for id in 0..critters as u64 {
            let critter = Critter::new(id, &config, &mut rng)?;
            let stream = ChaCha12Rng::seed_from_u64(rng.random());
            members.push(Member {
                critter,
                rng: stream,
            });
        }
        tracing::info!(critters, seed, "population created");
        Ok(Self {
            seed,
            config,
            members,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Feed every critter `steps` random percepts, in parallel.
    pub fn run(&mut self, steps: usize) -> Result<PopulationSummary, NetworkError> {
        let per_critter: Vec<(ActionCounts, u32, u64)> = self
            .members
            .par_iter_mut()
            .map(|member| -> Result<(ActionCounts, u32, u64), NetworkError> {
                let mut counts = ActionCounts::default();
                let mut streak = 0;
                for _ in 0..steps {
                    let percept = random_percept(&mut member.rng);
                    counts.record(member.critter.get_move(&percept)?);
                    streak = streak.max(member.critter.hops());
                }
                Ok((counts, streak, member.critter.id()))
            })
            .collect::<Result<_, _>>()?;

        let actions = per_critter
            .iter()
            .fold(ActionCounts::default(), |acc, (counts, _, _)| acc.merge(*counts));
        let best = per_critter
            .iter()
            .fold(None::<(u32, u64)>, |best, &(_, streak, id)| match best {
                Some((top, _)) if top >= streak => best,
                _ => Some((streak, id)),
            });

        tracing::debug!(total = actions.total(), "population run finished");

        Ok(PopulationSummary {
            seed: self.seed,
            critters: self.members.len(),
            steps,
            config: self.config.clone(),
            weights_per_critter: self.config.weight_count(),
            actions,
            longest_hop_streak: best.map_or(0, |(streak, _)| streak),
            best_hopper: best.map(|(_, id)| id),
        })
    }
}
