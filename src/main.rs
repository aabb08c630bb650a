use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use rand::thread_rng;

use gridq::{
    env::GridState,
    error::Error,
    eval::{EvalMode, Evaluator},
    gym::GridWorld,
    store::{FileStore, TableStore, DEFAULT_TABLE_PATH},
    trainer::{TrainConfig, Trainer},
    viz,
};

#[derive(Parser)]
#[command(name = "gridq", about = "Tabular Q-learning on grid environments", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GridArgs {
    /// Side length of the square grid
    #[arg(long, default_value_t = 5)]
    grid_size: usize,

    /// Goal cell as `row,col`; defaults to the bottom-right corner
    #[arg(long, value_parser = parse_coord)]
    goal: Option<GridState>,

    /// Hazard cell as `row,col`; may be repeated
    #[arg(long = "hazard", value_parser = parse_coord)]
    hazards: Vec<GridState>,

    /// Add a fifth no-op action to the action set
    #[arg(long)]
    stay_action: bool,
}

impl GridArgs {
    fn build(&self) -> Result<GridWorld, Error> {
        if self.grid_size < 2 {
            return Err(Error::InvalidConfig {
                name: "grid_size",
                value: self.grid_size.to_string(),
                bounds: "at least 2",
            });
        }
        let in_bounds = |s: GridState| s.0 < self.grid_size && s.1 < self.grid_size;
        for &hazard in &self.hazards {
            if !in_bounds(hazard) {
                return Err(Error::InvalidConfig {
                    name: "hazard",
                    value: format!("{hazard:?}"),
                    bounds: "within the grid",
                });
            }
        }
        if let Some(goal) = self.goal {
            if !in_bounds(goal) {
                return Err(Error::InvalidConfig {
                    name: "goal",
                    value: format!("{goal:?}"),
                    bounds: "within the grid",
                });
            }
        }

        let mut env = GridWorld::new(self.grid_size).with_hazards(self.hazards.clone());
        if let Some(goal) = self.goal {
            env = env.with_goal(goal);
        }
        if self.stay_action {
            env = env.with_stay_action();
        }
        Ok(env)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Train an agent and persist the learned Q-table
    Train {
        #[command(flatten)]
        grid: GridArgs,

        /// Where to save the Q-table
        #[arg(long, default_value = DEFAULT_TABLE_PATH)]
        table: PathBuf,

        #[arg(long, default_value_t = 1000)]
        episodes: u32,

        /// Initial exploration rate
        #[arg(long, default_value_t = 1.0)]
        epsilon: f64,

        /// Exploration floor
        #[arg(long, default_value_t = 0.05)]
        epsilon_min: f64,

        /// Multiplicative per-episode epsilon decay factor
        #[arg(long, default_value_t = 0.995)]
        epsilon_decay: f64,

        /// Learning rate
        #[arg(long, default_value_t = 0.7)]
        alpha: f64,

        /// Discount factor
        #[arg(long, default_value_t = 0.99)]
        gamma: f64,

        /// Per-episode step cap
        #[arg(long, default_value_t = 1000)]
        step_cap: u32,

        /// Render the grid after every training step
        #[arg(long)]
        render: bool,
    },

    /// Replay the learned policy from a saved Q-table, without learning
    Eval {
        #[command(flatten)]
        grid: GridArgs,

        /// Where to load the Q-table from
        #[arg(long, default_value = DEFAULT_TABLE_PATH)]
        table: PathBuf,

        /// Sample among positive-valued actions instead of strict argmax
        #[arg(long)]
        positive_sampling: bool,
    },

    /// Print per-action heatmaps of a saved Q-table
    Viz {
        #[command(flatten)]
        grid: GridArgs,

        /// Where to load the Q-table from
        #[arg(long, default_value = DEFAULT_TABLE_PATH)]
        table: PathBuf,
    },
}

fn parse_coord(s: &str) -> Result<GridState, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{s}`"))?;
    let row = row.trim().parse().map_err(|e| format!("bad row: {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad col: {e}"))?;
    Ok((row, col))
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        // a missing table is a user condition, not a crash
        Err(e @ Error::TableMissing { .. }) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Train {
            grid,
            table,
            episodes,
            epsilon,
            epsilon_min,
            epsilon_decay,
            alpha,
            gamma,
            step_cap,
            render,
        } => {
            let config = TrainConfig {
                num_episodes: episodes,
                epsilon,
                epsilon_min,
                epsilon_decay,
                alpha,
                gamma,
                step_cap,
                render_during_training: render,
            };
            let mut env = grid.build()?;
            let mut trainer = Trainer::new(config, FileStore::new(&table))?;
            trainer.train(&mut env, &mut thread_rng())?;
            println!("training finished; Q-table saved to `{}`", table.display());
        }

        Command::Eval {
            grid,
            table,
            positive_sampling,
        } => {
            let loaded = FileStore::new(&table).load()?;
            let mode = if positive_sampling {
                EvalMode::PositiveSampling
            } else {
                EvalMode::Greedy
            };
            let mut env = grid.build()?;
            let rollout = Evaluator::new(mode).run(&mut env, &loaded, &mut thread_rng())?;

            println!("path of the agent:");
            for state in &rollout.trajectory {
                println!("  {state:?}");
            }
            println!(
                "total steps {}, total reward {}",
                rollout.steps, rollout.total_reward
            );
        }

        Command::Viz { grid, table } => {
            let loaded = FileStore::new(&table).load()?;
            let env = grid.build()?;
            print!(
                "{}",
                viz::render_heatmaps(&loaded, env.goal(), env.hazards(), env.action_labels())
            );
        }
    }

    Ok(())
}
