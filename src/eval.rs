use rand::Rng;

use crate::{
    env::{Environment, GridState},
    error::{Error, Result},
    table::QTable,
};

/// How the evaluator picks an action from a state's values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvalMode {
    /// Lowest-index argmax; the same tie-break as training-time exploitation
    #[default]
    Greedy,
    /// Sample uniformly among strictly positive-valued actions, falling back
    /// to the greedy argmax when none are positive. Produces different
    /// trajectories than [`Greedy`](EvalMode::Greedy) whenever several
    /// actions at a state have positive value.
    PositiveSampling,
}

/// Result of one evaluation rollout
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout {
    /// Visited states, starting with the initial state
    pub trajectory: Vec<GridState>,
    pub total_reward: f64,
    pub steps: u32,
}

/// Executes a learned policy without further learning
///
/// The table is read-only here and no exploration happens. Unlike the
/// trainer there is no step cap: once exploration is off, the environment's
/// own episode termination is trusted.
pub struct Evaluator {
    mode: EvalMode,
}

impl Evaluator {
    pub fn new(mode: EvalMode) -> Self {
        Self { mode }
    }

    /// Roll out one episode from an evaluation-mode reset until the
    /// environment reports done
    ///
    /// **Errors** with [`Error::ShapeMismatch`] when the table was trained
    /// against a differently shaped environment
    pub fn run<E: Environment>(
        &self,
        env: &mut E,
        table: &QTable,
        rng: &mut impl Rng,
    ) -> Result<Rollout> {
        let expected = [env.grid_size(), env.grid_size(), env.num_actions()];
        let (rows, cols, actions) = table.shape();
        if [rows, cols, actions] != expected {
            return Err(Error::ShapeMismatch {
                expected,
                found: [rows, cols, actions],
            });
        }

        let mut state = env.reset_eval().map_err(Error::Env)?;
        let mut rollout = Rollout {
            trajectory: vec![state],
            total_reward: 0.0,
            steps: 0,
        };

        loop {
            let action = self.pick(table, state, rng);
            let step = env.step(action).map_err(Error::Env)?;
            env.render();

            rollout.total_reward += step.reward;
            rollout.steps += 1;
            rollout.trajectory.push(step.next_state);
            state = step.next_state;

            if step.done {
                return Ok(rollout);
            }
        }
    }

    fn pick(&self, table: &QTable, state: GridState, rng: &mut impl Rng) -> usize {
        match self.mode {
            EvalMode::Greedy => table.greedy_action(state),
            EvalMode::PositiveSampling => {
                let positive = table
                    .row(state)
                    .iter()
                    .enumerate()
                    .filter(|&(_, &v)| v > 0.0)
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>();
                if positive.is_empty() {
                    table.greedy_action(state)
                } else {
                    positive[rng.gen_range(0..positive.len())]
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use crate::{
        gym::GridWorld,
        store::{MemoryStore, TableStore},
        trainer::{TrainConfig, Trainer},
    };

    use super::*;

    #[test]
    fn greedy_follows_the_argmax_path() {
        // 2x2 grid, values steering Right then Down to the goal at (1, 1)
        let mut table = QTable::zeros(2, 4);
        table.set((0, 0), 2, 1.0); // Right
        table.set((0, 1), 1, 1.0); // Down

        let mut env = GridWorld::new(2);
        let mut rng = SmallRng::seed_from_u64(5);
        let rollout = Evaluator::new(EvalMode::Greedy)
            .run(&mut env, &table, &mut rng)
            .unwrap();

        assert_eq!(rollout.trajectory, vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(rollout.steps, 2);
        assert_eq!(rollout.total_reward, 1.0);
    }

    #[test]
    fn positive_sampling_falls_back_to_greedy() {
        // no positive values anywhere, so the mode degrades to greedy
        let mut table = QTable::zeros(2, 4);
        for action in 0..4 {
            table.set((0, 0), action, -0.3);
            table.set((1, 0), action, -0.2);
        }
        table.set((0, 0), 1, -0.05); // Down is least bad at the start
        table.set((1, 0), 2, -0.01); // then Right into the goal

        let mut rng = SmallRng::seed_from_u64(6);
        let rollout = Evaluator::new(EvalMode::PositiveSampling)
            .run(&mut GridWorld::new(2), &table, &mut rng)
            .unwrap();
        assert_eq!(rollout.trajectory, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn positive_sampling_stays_within_positive_actions() {
        let mut table = QTable::zeros(2, 4);
        // only Right is positive at the start; Down at (0, 1)
        table.set((0, 0), 2, 0.3);
        table.set((0, 1), 1, 0.8);

        let mut rng = SmallRng::seed_from_u64(7);
        let rollout = Evaluator::new(EvalMode::PositiveSampling)
            .run(&mut GridWorld::new(2), &table, &mut rng)
            .unwrap();
        assert_eq!(rollout.trajectory, vec![(0, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn rejects_mismatched_table_shape() {
        let table = QTable::zeros(3, 4);
        let mut rng = SmallRng::seed_from_u64(8);
        let err = Evaluator::new(EvalMode::Greedy)
            .run(&mut GridWorld::new(5), &table, &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn trained_policy_reaches_the_goal() {
        // 3x3 grid, goal at (2, 2) worth +1, everything else 0 and
        // non-terminal; epsilon decays 1.0 -> 0.05 over 200 episodes
        let mut env = GridWorld::new(3);
        let config = TrainConfig {
            num_episodes: 200,
            epsilon: 1.0,
            epsilon_min: 0.05,
            epsilon_decay: 0.99,
            alpha: 0.5,
            gamma: 0.9,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(42);
        let mut trainer = Trainer::new(config, MemoryStore::default()).unwrap();
        let table = trainer.train(&mut env, &mut rng).unwrap();

        // evaluate from the persisted copy, as a real run would
        let stored = trainer.into_store().load().unwrap();
        assert_eq!(stored, table);

        let rollout = Evaluator::new(EvalMode::Greedy)
            .run(&mut env, &stored, &mut rng)
            .unwrap();
        assert_eq!(rollout.trajectory.first(), Some(&(0, 0)));
        assert_eq!(rollout.trajectory.last(), Some(&(2, 2)));
        // shortest path is 4 steps; allow slack but demand finiteness
        assert!(rollout.steps >= 4 && rollout.steps <= 16);
        assert_eq!(rollout.total_reward, 1.0);
    }
}
