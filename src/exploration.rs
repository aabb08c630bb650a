use rand::Rng;

use crate::{decay::Decay, env::GridState, table::QTable};

/// Exploration policy result
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon greedy exploration policy with an episode-decaying epsilon threshold
///
/// Every call draws one independent uniform sample from the caller-supplied
/// generator; there is no cross-call state and no repeat avoidance.
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon threshold for the given episode
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode)
    }

    /// Invoke epsilon greedy policy for the current episode
    pub fn choose(&self, rng: &mut impl Rng, episode: u32) -> Choice {
        if rng.gen::<f64>() < self.epsilon.evaluate(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Select an action index for `state`: a uniformly random action when
    /// exploring, otherwise the table's greedy action (ties to the lowest
    /// action index)
    pub fn select(
        &self,
        rng: &mut impl Rng,
        table: &QTable,
        state: GridState,
        episode: u32,
    ) -> usize {
        match self.choose(rng, episode) {
            Choice::Explore => rng.gen_range(0..table.num_actions()),
            Choice::Exploit => table.greedy_action(state),
        }
    }
}
