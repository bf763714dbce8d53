// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Anthill: a turn-based colony battle on a toroidal grid.
//!
//! Colonies of ants fight for food and hills on a map whose edges wrap.
//! Each colony is steered by an agent: a built-in policy or an external
//! program speaking a line protocol over its stdin and stdout.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Session (turn engine loop)     │
//! ├──────────────────┬──────────────────┤
//! │    Game rules    │  Agent adapters  │
//! ├──────────────────┴──────────────────┤
//! │       Geometry and grid store       │
//! └─────────────────────────────────────┘
//! ```

pub mod agent;
pub mod error;
pub mod game;
pub mod session;

pub use error::{AgentError, MapError, SessionError};

// Re-export key types at crate root for convenience
pub use agent::{Agent, AgentSpec, BoxedAgent, SetupInfo};
pub use game::{ColonyId, Coord, Direction, MapText, Order, Rules, Snapshot, Torus, World};
pub use session::{run_game, GameResult, Session, SessionConfig, SnapshotSlot};
