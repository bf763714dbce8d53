//! CLI command implementations for Anthill.

pub(crate) mod run;
pub(crate) mod validate;
pub(crate) mod watch;

mod output;

use anthill::{AgentSpec, Rules, SessionConfig};
use clap::{Args, ValueEnum};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Agents and rules shared by `run` and `watch`.
#[derive(Args, Debug, Clone)]
pub(crate) struct GameArgs {
    /// Agent for the next colony: `lazy`, `random` or a command line
    #[arg(short, long = "agent", value_name = "SPEC")]
    pub(crate) agents: Vec<AgentSpec>,

    /// Random seed (default: random)
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Maximum turns (default: 1000)
    #[arg(short, long, default_value = "1000")]
    pub(crate) turns: u32,

    /// Mirror food vertically for hills in the lower half
    #[arg(long)]
    pub(crate) symmetric: bool,

    /// Squared view radius
    #[arg(long, default_value = "55", value_parser = radius2_parser())]
    pub(crate) view_radius2: u32,

    /// Squared attack radius
    #[arg(long, default_value = "5", value_parser = radius2_parser())]
    pub(crate) attack_radius2: u32,

    /// Squared food-gathering radius
    #[arg(long, default_value = "1", value_parser = radius2_parser())]
    pub(crate) spawn_radius2: u32,

    /// Expected new food per turn
    #[arg(long, default_value = "0.3")]
    pub(crate) food_rate: f64,

    /// Per-turn time budget for process agents, in milliseconds
    #[arg(long = "turntime", default_value = "1000")]
    pub(crate) turn_time_ms: u64,

    /// Start-up time budget for process agents, in milliseconds
    #[arg(long = "loadtime", default_value = "3000")]
    pub(crate) load_time_ms: u64,
}

impl GameArgs {
    /// Session configuration for these arguments.
    pub(crate) fn config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            rules: Rules {
                view_radius2: self.view_radius2,
                attack_radius2: self.attack_radius2,
                spawn_radius2: self.spawn_radius2,
                max_turns: self.turns,
                symmetric: self.symmetric,
                food_rate: self.food_rate,
                ..Rules::default()
            },
            load_time_ms: self.load_time_ms,
            turn_time_ms: self.turn_time_ms,
            seed: self.seed.unwrap_or_else(random_seed),
            ..defaults
        }
    }
}

/// Largest squared radius accepted on the command line.
const MAX_RADIUS2: i64 = 10_000;

fn radius2_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=MAX_RADIUS2)
}

/// Seed from the clock when none was given.
#[allow(clippy::cast_possible_truncation)]
fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Read a map file.
pub(crate) fn read_map(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<anthill::SessionError> for CliError {
    fn from(e: anthill::SessionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<anthill::MapError> for CliError {
    fn from(e: anthill::MapError) -> Self {
        Self::new(format!("Invalid map: {e}"))
    }
}
