/// Implementations of strategies for episode-decaying hyperparameters
pub mod decay;

/// Environment interface
pub mod env;

/// Error taxonomy
pub mod error;

/// Greedy policy evaluation
pub mod eval;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Value table persistence
pub mod store;

/// Dense action-value table and the Q-learning update rule
pub mod table;

/// Training loop
pub mod trainer;

/// Value table heatmap rendering
pub mod viz;
