use ndarray::{s, Array3, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::env::GridState;

/// A dense action-value table over a square grid
///
/// Maps every `(state, action)` pair to a scalar estimate of the expected
/// discounted future reward. Shape is `(grid_size, grid_size, num_actions)`
/// and every entry is defined and finite from construction onward; during
/// training, entries are written only by [`update`](QTable::update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: Array3<f64>,
}

impl QTable {
    /// Zero-initialized table for a `grid_size` x `grid_size` grid with
    /// `num_actions` actions
    pub fn zeros(grid_size: usize, num_actions: usize) -> Self {
        Self {
            values: Array3::zeros((grid_size, grid_size, num_actions)),
        }
    }

    /// `(grid_size, grid_size, num_actions)`
    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    pub fn grid_size(&self) -> usize {
        self.values.dim().0
    }

    pub fn num_actions(&self) -> usize {
        self.values.dim().2
    }

    pub fn get(&self, state: GridState, action: usize) -> f64 {
        self.values[[state.0, state.1, action]]
    }

    /// Overwrite a single entry; table construction outside of training
    /// (the trainer itself only writes through [`update`](QTable::update))
    pub fn set(&mut self, state: GridState, action: usize, value: f64) {
        self.values[[state.0, state.1, action]] = value;
    }

    /// Values for every action at `state`, in action-index order
    pub fn row(&self, state: GridState) -> ArrayView1<f64> {
        self.values.slice(s![state.0, state.1, ..])
    }

    /// Best-valued action at `state`; ties break to the lowest action index
    pub fn greedy_action(&self, state: GridState) -> usize {
        let row = self.row(state);
        let mut best = 0;
        for (i, &v) in row.iter().enumerate().skip(1) {
            if v > row[best] {
                best = i;
            }
        }
        best
    }

    /// Maximum value over the action set at `state`
    pub fn max_value(&self, state: GridState) -> f64 {
        self.row(state)
            .iter()
            .fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
    }

    /// One-step Q-learning backup, applied in place:
    ///
    /// `q[s][a] += alpha * (reward + gamma * max_a' q[s'][a'] - q[s][a])`
    ///
    /// Called exactly once per environment step with the pre-step state, the
    /// action taken, and the post-step observation. The max at `next_state`
    /// uses the table's current estimates. No clipping or normalization.
    pub fn update(
        &mut self,
        state: GridState,
        action: usize,
        reward: f64,
        next_state: GridState,
        alpha: f64,
        gamma: f64,
    ) {
        let target = reward + gamma * self.max_value(next_state);
        let q = &mut self.values[[state.0, state.1, action]];
        *q += alpha * (target - *q);
    }

    /// True when every entry is finite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
