use anyhow::Result;

/// Grid coordinates as `(row, col)`, each in `[0, grid_size)`
pub type GridState = (usize, usize);

/// One environment transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// The observation after the action was applied
    pub next_state: GridState,
    /// The reward received for the transition
    pub reward: f64,
    /// Whether the episode ended on this transition
    pub done: bool,
}

/// Represents a discrete grid Markov decision process, defining the dynamics
/// of an environment in which an agent can operate.
///
/// States are cells of a square grid and actions are indices into a fixed,
/// ordered action set whose cardinality is reported by [`num_actions`].
/// The trainer and evaluator depend only on this trait, so any grid dynamics
/// (or a test double) can be substituted.
///
/// `reset` and `step` are fallible: an error from either is a contract
/// violation and aborts the surrounding training or evaluation run.
///
/// [`num_actions`]: Environment::num_actions
pub trait Environment {
    /// Side length of the square grid
    fn grid_size(&self) -> usize;

    /// Cardinality of the ordered action set
    ///
    /// The returned value should never be zero, instead specify an action that
    /// represents doing nothing if necessary.
    fn num_actions(&self) -> usize;

    /// Begin a training episode
    ///
    /// **Returns** the initial state
    fn reset(&mut self) -> Result<GridState>;

    /// Begin an evaluation episode
    ///
    /// Defaults to [`reset`](Environment::reset); environments that behave
    /// differently outside of training override this.
    fn reset_eval(&mut self) -> Result<GridState> {
        self.reset()
    }

    /// Apply an action, producing the next observation, a reward, and the
    /// episode-termination flag
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Draw the current state of the environment; side-effecting, no return
    /// contract is relied upon
    fn render(&self) {}

    /// Release any resources held by the environment
    fn close(&mut self) {}
}
