use anyhow::{ensure, Result};

use crate::env::{Environment, GridState, Step};

/// The ordered action set of [`GridWorld`]
///
/// Index order is significant; the fifth `Stay` action only exists when the
/// world is built with [`GridWorld::with_stay_action`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
    Stay = 4,
}

impl Action {
    /// Canonical labels, in action-index order
    pub const LABELS: [&'static str; 5] = ["Up", "Down", "Right", "Left", "Stay"];

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            2 => Some(Self::Right),
            3 => Some(Self::Left),
            4 => Some(Self::Stay),
            _ => None,
        }
    }
}

/// A simple square grid environment with one terminal goal cell and any
/// number of terminal hazard cells
///
/// The agent starts at a fixed cell and moves one cell per step; moves off
/// the edge leave it in place. Landing on the goal or a hazard ends the
/// episode with that cell's reward, every other transition yields the step
/// reward.
///
/// Intended for use with the [`Trainer`](crate::trainer::Trainer) and
/// [`Evaluator`](crate::eval::Evaluator).
pub struct GridWorld {
    size: usize,
    start: GridState,
    goal: GridState,
    hazards: Vec<GridState>,
    stay_action: bool,
    goal_reward: f64,
    hazard_reward: f64,
    step_reward: f64,
    pos: GridState,
    done: bool,
}

impl GridWorld {
    /// A `size` x `size` world with the start at `(0, 0)`, the goal at
    /// `(size - 1, size - 1)`, no hazards, and rewards `+1` / `-1` / `0`
    ///
    /// **Panics** if `size < 2`
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "a grid world needs at least 2x2 cells");
        Self {
            size,
            start: (0, 0),
            goal: (size - 1, size - 1),
            hazards: Vec::new(),
            stay_action: false,
            goal_reward: 1.0,
            hazard_reward: -1.0,
            step_reward: 0.0,
            pos: (0, 0),
            done: false,
        }
    }

    pub fn with_start(mut self, start: GridState) -> Self {
        assert!(self.in_bounds(start));
        self.start = start;
        self.pos = start;
        self
    }

    pub fn with_goal(mut self, goal: GridState) -> Self {
        assert!(self.in_bounds(goal));
        self.goal = goal;
        self
    }

    pub fn with_hazards(mut self, hazards: Vec<GridState>) -> Self {
        assert!(hazards.iter().all(|&h| self.in_bounds(h)));
        self.hazards = hazards;
        self
    }

    /// Add the fifth no-op action to the action set
    pub fn with_stay_action(mut self) -> Self {
        self.stay_action = true;
        self
    }

    pub fn with_rewards(mut self, goal: f64, hazard: f64, step: f64) -> Self {
        self.goal_reward = goal;
        self.hazard_reward = hazard;
        self.step_reward = step;
        self
    }

    pub fn goal(&self) -> GridState {
        self.goal
    }

    pub fn hazards(&self) -> &[GridState] {
        &self.hazards
    }

    /// Action labels for this world's action set, in index order
    pub fn action_labels(&self) -> &'static [&'static str] {
        &Action::LABELS[..self.num_actions()]
    }

    fn in_bounds(&self, state: GridState) -> bool {
        state.0 < self.size && state.1 < self.size
    }
}

impl Environment for GridWorld {
    fn grid_size(&self) -> usize {
        self.size
    }

    fn num_actions(&self) -> usize {
        if self.stay_action {
            5
        } else {
            4
        }
    }

    fn reset(&mut self) -> Result<GridState> {
        self.pos = self.start;
        self.done = false;
        Ok(self.pos)
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        ensure!(!self.done, "episode is over, reset before stepping");
        ensure!(
            action < self.num_actions(),
            "action index {action} out of range for {} actions",
            self.num_actions()
        );
        let action =
            Action::from_index(action).expect("indices below num_actions are always mapped");

        let (row, col) = self.pos;
        let next_state = match action {
            Action::Up => (row.saturating_sub(1), col),
            Action::Down => ((row + 1).min(self.size - 1), col),
            Action::Right => (row, (col + 1).min(self.size - 1)),
            Action::Left => (row, col.saturating_sub(1)),
            Action::Stay => (row, col),
        };

        let (reward, done) = if next_state == self.goal {
            (self.goal_reward, true)
        } else if self.hazards.contains(&next_state) {
            (self.hazard_reward, true)
        } else {
            (self.step_reward, false)
        };

        self.pos = next_state;
        self.done = done;
        Ok(Step {
            next_state,
            reward,
            done,
        })
    }

    fn render(&self) {
        let mut out = String::with_capacity((self.size + 1) * self.size * 2);
        for row in 0..self.size {
            for col in 0..self.size {
                let c = if (row, col) == self.pos {
                    'A'
                } else if (row, col) == self.goal {
                    'G'
                } else if self.hazards.contains(&(row, col)) {
                    'H'
                } else {
                    '.'
                };
                out.push(c);
                out.push(' ');
            }
            out.push('\n');
        }
        println!("{out}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_clamp_at_the_edges() {
        let mut env = GridWorld::new(3);
        env.reset().unwrap();

        let step = env.step(Action::Up as usize).unwrap();
        assert_eq!(step.next_state, (0, 0));
        let step = env.step(Action::Left as usize).unwrap();
        assert_eq!(step.next_state, (0, 0));
        assert!(!step.done);
        assert_eq!(step.reward, 0.0);
    }

    #[test]
    fn reaching_the_goal_terminates() {
        let mut env = GridWorld::new(2);
        env.reset().unwrap();

        env.step(Action::Right as usize).unwrap();
        let step = env.step(Action::Down as usize).unwrap();
        assert_eq!(step.next_state, (1, 1));
        assert!(step.done);
        assert_eq!(step.reward, 1.0);
    }

    #[test]
    fn hazards_terminate_with_negative_reward() {
        let mut env = GridWorld::new(3).with_hazards(vec![(0, 1)]);
        env.reset().unwrap();

        let step = env.step(Action::Right as usize).unwrap();
        assert_eq!(step.next_state, (0, 1));
        assert!(step.done);
        assert_eq!(step.reward, -1.0);
    }

    #[test]
    fn stepping_a_finished_episode_is_an_error() {
        let mut env = GridWorld::new(2);
        env.reset().unwrap();
        env.step(Action::Right as usize).unwrap();
        env.step(Action::Down as usize).unwrap();
        assert!(env.step(Action::Up as usize).is_err());

        env.reset().unwrap();
        assert!(env.step(Action::Up as usize).is_ok());
    }

    #[test]
    fn action_set_cardinality() {
        let env = GridWorld::new(3);
        assert_eq!(env.num_actions(), 4);
        assert_eq!(env.action_labels(), ["Up", "Down", "Right", "Left"]);

        let mut env = GridWorld::new(3).with_stay_action();
        assert_eq!(env.num_actions(), 5);
        assert_eq!(env.action_labels().last(), Some(&"Stay"));

        env.reset().unwrap();
        let step = env.step(Action::Stay as usize).unwrap();
        assert_eq!(step.next_state, (0, 0));
        assert!(!step.done);
    }

    #[test]
    fn out_of_range_actions_are_rejected() {
        let mut env = GridWorld::new(3);
        env.reset().unwrap();
        assert!(env.step(4).is_err());
        assert!(env.step(17).is_err());
    }
}
