//! Agents: whoever decides the moves of one colony.
//!
//! An agent is consulted once per turn with the colony's visible cells
//! and answers with a list of orders. Built-in policies run in process;
//! anything else is an external program spoken to over the line
//! protocol in [`protocol`].

mod builtin;
mod process;
pub mod protocol;

use std::fmt;
use std::str::FromStr;

pub use builtin::{LazyAgent, RandomAgent};
pub use process::ProcessAgent;

use crate::error::AgentError;
use crate::game::{ColonyId, Order, VisibleCell, World};

/// Fixed parameters announced to an agent before the first turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupInfo {
    /// The colony this agent plays.
    pub colony: ColonyId,
    /// Number of colonies in the game.
    pub colonies: usize,
    /// Map rows.
    pub rows: u16,
    /// Map columns.
    pub cols: u16,
    /// Turn budget.
    pub turns: u32,
    /// Squared view radius.
    pub view_radius2: u32,
    /// Squared attack radius.
    pub attack_radius2: u32,
    /// Squared food-gathering radius.
    pub spawn_radius2: u32,
    /// Time allowed for the start-up handshake, in milliseconds.
    pub load_time_ms: u64,
    /// Time allowed per turn, in milliseconds.
    pub turn_time_ms: u64,
    /// Seed handed to the agent for its own use.
    pub player_seed: u64,
}

impl SetupInfo {
    /// Describe `world` to the agent playing `colony`.
    #[must_use]
    pub fn for_world(
        world: &World,
        colony: ColonyId,
        load_time_ms: u64,
        turn_time_ms: u64,
        player_seed: u64,
    ) -> Self {
        let rules = world.rules();
        Self {
            colony,
            colonies: world.colony_count(),
            rows: world.torus().height(),
            cols: world.torus().width(),
            turns: rules.max_turns,
            view_radius2: rules.view_radius2,
            attack_radius2: rules.attack_radius2,
            spawn_radius2: rules.spawn_radius2,
            load_time_ms,
            turn_time_ms,
            player_seed,
        }
    }
}

/// A decision maker for one colony.
pub trait Agent {
    /// Short label for logs and results.
    fn name(&self) -> &str;

    /// Decide this turn's orders.
    ///
    /// `view` is what the colony sees this turn; `world` is the full
    /// start-of-turn state for in-process policies.
    fn play_turn(&mut self, view: &[VisibleCell], turn: u32, world: &World) -> Vec<Order>;

    /// The game is over; `scores` are indexed by colony id.
    fn end_game(&mut self, scores: &[i32]) {
        let _ = scores;
    }
}

/// An agent that can be moved onto the engine thread.
pub type BoxedAgent = Box<dyn Agent + Send>;

/// How to create an agent, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentSpec {
    /// Never moves.
    Lazy,
    /// Moves every ant in a random legal direction.
    Random,
    /// Launch this command line and talk to it over pipes.
    Process(String),
}

impl AgentSpec {
    /// Create the agent for the colony described by `setup`.
    ///
    /// `seed` feeds in-process random policies.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] if an external process cannot be
    /// started.
    pub fn build(&self, setup: &SetupInfo, seed: u64) -> Result<BoxedAgent, AgentError> {
        Ok(match self {
            AgentSpec::Lazy => Box::new(LazyAgent),
            AgentSpec::Random => Box::new(RandomAgent::new(setup.colony, seed)),
            AgentSpec::Process(command) => Box::new(ProcessAgent::spawn(command, setup)?),
        })
    }
}

impl FromStr for AgentSpec {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(AgentError::EmptyCommand),
            "lazy" => Ok(AgentSpec::Lazy),
            "random" => Ok(AgentSpec::Random),
            command => Ok(AgentSpec::Process(command.to_string())),
        }
    }
}

impl fmt::Display for AgentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentSpec::Lazy => f.write_str("lazy"),
            AgentSpec::Random => f.write_str("random"),
            AgentSpec::Process(command) => f.write_str(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Rules;

    #[test]
    fn test_parse_agent_spec() {
        assert_eq!("lazy".parse::<AgentSpec>().unwrap(), AgentSpec::Lazy);
        assert_eq!(" random ".parse::<AgentSpec>().unwrap(), AgentSpec::Random);
        assert_eq!(
            "python3 bot.py --fast".parse::<AgentSpec>().unwrap(),
            AgentSpec::Process("python3 bot.py --fast".to_string())
        );
        assert!(matches!(
            "  ".parse::<AgentSpec>(),
            Err(AgentError::EmptyCommand)
        ));
    }

    #[test]
    fn test_spec_display_round_trips() {
        for text in ["lazy", "random", "./bot -v"] {
            assert_eq!(text.parse::<AgentSpec>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_setup_info_from_world() {
        let rules = Rules {
            max_turns: 250,
            ..Rules::default()
        };
        let world = World::load("players 2\nrows 2\ncols 3\nm a.1\nm 0.b\n", rules, 1).unwrap();
        let setup = SetupInfo::for_world(&world, ColonyId(1), 3000, 1000, 42);
        assert_eq!(setup.rows, 2);
        assert_eq!(setup.cols, 3);
        assert_eq!(setup.colonies, 2);
        assert_eq!(setup.turns, 250);
        assert_eq!(setup.view_radius2, 55);
        assert_eq!(setup.colony, ColonyId(1));
    }

    #[test]
    fn test_builtin_agents_build() {
        let world = World::load("players 1\nrows 1\ncols 3\nm a..\n", Rules::default(), 1).unwrap();
        let setup = SetupInfo::for_world(&world, ColonyId(0), 3000, 1000, 42);
        assert_eq!(AgentSpec::Lazy.build(&setup, 0).unwrap().name(), "lazy");
        assert_eq!(AgentSpec::Random.build(&setup, 0).unwrap().name(), "random");
    }
}
