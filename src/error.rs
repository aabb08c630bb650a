use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected at entry, before any episode runs.
    #[error("invalid value for `{name}`: got {value}, must be {bounds}")]
    InvalidConfig {
        name: &'static str,
        value: String,
        bounds: &'static str,
    },

    /// Recoverable: train first, or point at the right file.
    #[error("no saved Q-table at `{path}`; train first or check the path")]
    TableMissing { path: PathBuf },

    /// A loaded table does not fit the environment it is being replayed in.
    #[error("Q-table shape {found:?} does not match environment shape {expected:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        found: [usize; 3],
    },

    /// Environment contract violation. Fatal to the running operation;
    /// continuing would corrupt the value table.
    #[error("environment failure: {0}")]
    Env(anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Q-table serialization failed: {0}")]
    Codec(#[from] bincode::Error),
}
