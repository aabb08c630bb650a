use log::info;
use rand::Rng;

use crate::{
    decay::Geometric,
    env::Environment,
    error::{Error, Result},
    exploration::EpsilonGreedy,
    store::TableStore,
    table::QTable,
};

/// Hyperparameters and knobs for one training run
///
/// Validated as a whole before any episode runs; the trainer refuses
/// degenerate configurations instead of silently producing garbage.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub num_episodes: u32,
    /// Initial exploration rate, in `[0, 1]`
    pub epsilon: f64,
    /// Exploration floor, in `[0, epsilon]`
    pub epsilon_min: f64,
    /// Multiplicative per-episode decay factor, in `(0, 1]`
    pub epsilon_decay: f64,
    /// Learning rate, in `(0, 1]`
    pub alpha: f64,
    /// Discount factor, in `[0, 1]`
    pub gamma: f64,
    /// Per-episode step cap; ends a stuck episode normally rather than
    /// hanging the loop when termination is unreachable under exploration
    pub step_cap: u32,
    pub render_during_training: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1000,
            epsilon: 1.0,
            epsilon_min: 0.05,
            epsilon_decay: 0.995,
            alpha: 0.7,
            gamma: 0.99,
            step_cap: 1000,
            render_during_training: false,
        }
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            name,
            value: value.to_string(),
            bounds: "in the interval [0, 1]",
        })
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_episodes == 0 {
            return Err(Error::InvalidConfig {
                name: "num_episodes",
                value: "0".into(),
                bounds: "at least 1",
            });
        }
        check_unit_interval("epsilon", self.epsilon)?;
        check_unit_interval("epsilon_min", self.epsilon_min)?;
        if self.epsilon_min > self.epsilon {
            return Err(Error::InvalidConfig {
                name: "epsilon_min",
                value: self.epsilon_min.to_string(),
                bounds: "at most `epsilon`",
            });
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(Error::InvalidConfig {
                name: "epsilon_decay",
                value: self.epsilon_decay.to_string(),
                bounds: "in the interval (0, 1]",
            });
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::InvalidConfig {
                name: "alpha",
                value: self.alpha.to_string(),
                bounds: "in the interval (0, 1]",
            });
        }
        check_unit_interval("gamma", self.gamma)?;
        if self.step_cap == 0 {
            return Err(Error::InvalidConfig {
                name: "step_cap",
                value: "0".into(),
                bounds: "at least 1",
            });
        }
        Ok(())
    }
}

/// Drives episodes against an environment, applies the one-step Q-learning
/// backup after every step, and persists the learned table through the
/// injected store once all episodes finish.
///
/// Environment errors are fatal and propagate immediately; the per-episode
/// step cap is the loop's only resilience mechanism, and hitting it ends the
/// episode normally.
pub struct Trainer<S: TableStore> {
    config: TrainConfig,
    store: S,
}

impl<S: TableStore> Trainer<S> {
    /// **Errors** if the configuration is invalid
    pub fn new(config: TrainConfig, store: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, store })
    }

    /// Run the full training loop
    ///
    /// **Returns** the learned table, which has also been saved to the store
    pub fn train<E: Environment>(&mut self, env: &mut E, rng: &mut impl Rng) -> Result<QTable> {
        let cfg = self.config.clone();
        let mut table = QTable::zeros(env.grid_size(), env.num_actions());
        let exploration =
            EpsilonGreedy::new(Geometric::new(cfg.epsilon_decay, cfg.epsilon, cfg.epsilon_min)?);

        for episode in 0..cfg.num_episodes {
            let mut state = env.reset().map_err(Error::Env)?;
            let mut total_reward = 0.0;
            let mut steps = 0;

            while steps < cfg.step_cap {
                let action = exploration.select(rng, &table, state, episode);
                let step = env.step(action).map_err(Error::Env)?;
                if cfg.render_during_training {
                    env.render();
                }

                table.update(state, action, step.reward, step.next_state, cfg.alpha, cfg.gamma);
                total_reward += step.reward;
                state = step.next_state;
                steps += 1;

                if step.done {
                    break;
                }
            }

            info!(
                "episode {episode}: steps {steps}, total reward {total_reward}, epsilon {:.4}",
                exploration.epsilon(episode)
            );
        }

        env.close();
        info!("training finished");
        self.store.save(&table)?;
        Ok(table)
    }

    /// Hand back the store, e.g. to reload what was just persisted
    pub fn into_store(self) -> S {
        self.store
    }
}
