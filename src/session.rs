//! Session runner for Anthill games.
//!
//! Provides a function interface: `(map, agents, config) -> GameResult`
//!
//! The session handles:
//! - Map loading and agent start-up
//! - Order collection, one colony at a time in colony order
//! - Turn resolution and invariant checks
//! - Publishing snapshots to readers on other threads
//! - Final scores and agent shutdown

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::agent::{AgentSpec, BoxedAgent, SetupInfo};
use crate::error::SessionError;
use crate::game::invariants::assert_invariants;
use crate::game::{ColonyId, ColonyStats, Fog, MapText, Rules, Snapshot, TurnReport, World};

/// Configuration for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Gameplay constants.
    pub rules: Rules,
    /// Start-up budget advertised to (and enforced on) process agents.
    pub load_time_ms: u64,
    /// Per-turn budget advertised to (and enforced on) process agents.
    pub turn_time_ms: u64,
    /// Seed handed to agents in the setup message.
    pub player_seed: u64,
    /// Seed for the world and the built-in agents.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            load_time_ms: 3000,
            turn_time_ms: 1000,
            player_seed: 42,
            seed: 0,
        }
    }
}

/// Final result of a game.
#[derive(Debug, Clone)]
pub struct GameResult {
    /// The winning colony (None if the top score is shared).
    pub winner: Option<ColonyId>,
    /// Final scores, indexed by colony.
    pub scores: Vec<i32>,
    /// Total turns played.
    pub turns_played: u32,
    /// Final per-colony statistics.
    pub colonies: Vec<ColonyStats>,
    /// Agent labels, indexed by colony.
    pub agents: Vec<String>,
    /// Ants lost to collisions and combat over the whole game.
    pub ants_lost: usize,
    /// Hills razed over the whole game.
    pub hills_razed: usize,
    /// Food harvested over the whole game.
    pub food_harvested: usize,
    /// The seed used for this game.
    pub seed: u64,
    /// The board after the last turn.
    pub final_map: MapText,
}

/// The colony with the strictly highest score, if there is one.
#[must_use]
pub fn winner(scores: &[i32]) -> Option<ColonyId> {
    let best = scores.iter().copied().max()?;
    let mut leaders = scores.iter().enumerate().filter(|&(_, &s)| s == best);
    let (index, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    u8::try_from(index).ok().map(ColonyId)
}

/// Load a map, start the agents and play the game to the end.
///
/// Colonies without an agent spec are played by [`AgentSpec::Lazy`].
///
/// # Errors
///
/// Returns an error if the map is malformed, more agents than colonies
/// are given, or an agent cannot be started.
pub fn run_game(
    map_text: &str,
    agents: &[AgentSpec],
    config: &SessionConfig,
) -> Result<GameResult, SessionError> {
    Ok(Session::new(map_text, agents, config)?.run())
}

/// The turn engine: one world, one agent per colony.
pub struct Session {
    world: World,
    agents: Vec<BoxedAgent>,
    fog: Fog,
    seed: u64,
    ants_lost: usize,
    hills_razed: usize,
    food_harvested: usize,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("turn", &self.world.turn())
            .field("agents", &self.agent_names())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Load the map, start one agent per colony and place the
    /// initial food and ants.
    ///
    /// # Errors
    ///
    /// Returns an error if the map is malformed, more agents than colonies
    /// are given, or an agent cannot be started.
    pub fn new(
        map_text: &str,
        specs: &[AgentSpec],
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        let mut world = World::load(map_text, config.rules, config.seed)?;
        let colonies = world.colony_count();
        if specs.len() > colonies {
            return Err(SessionError::AgentCount {
                expected: colonies,
                found: specs.len(),
            });
        }

        let mut agents = Vec::with_capacity(colonies);
        for colony in world.colonies().iter().map(|c| c.id) {
            let spec = specs.get(colony.index()).unwrap_or(&AgentSpec::Lazy);
            let setup = SetupInfo::for_world(
                &world,
                colony,
                config.load_time_ms,
                config.turn_time_ms,
                config.player_seed,
            );
            let agent_seed = config.seed.wrapping_add(u64::from(colony.0) + 1);
            let agent = spec
                .build(&setup, agent_seed)
                .map_err(|source| SessionError::Agent { colony, source })?;
            agents.push(agent);
        }

        world.populate();
        info!(
            colonies,
            rows = world.torus().height(),
            cols = world.torus().width(),
            max_turns = config.rules.max_turns,
            seed = config.seed,
            "session started"
        );
        Ok(Self::from_parts(world, agents, config.seed))
    }

    /// Assemble a session from a ready world and agents in colony
    /// order. The world is used as is.
    #[must_use]
    pub fn from_parts(world: World, agents: Vec<BoxedAgent>, seed: u64) -> Self {
        let fog = Fog::new(world.torus(), world.colony_count());
        Self {
            world,
            agents,
            fog,
            seed,
            ants_lost: 0,
            hills_razed: 0,
            food_harvested: 0,
        }
    }

    /// The current world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Agent labels in colony order.
    #[must_use]
    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    /// Whether the turn budget is spent.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.world.is_finished()
    }

    /// Play one turn.
    pub fn step(&mut self) -> TurnReport {
        self.world.begin_turn();
        let turn = self.world.turn();

        // Phase 1: every agent sees the same start-of-turn world
        let mut orders = Vec::with_capacity(self.agents.len());
        for (index, agent) in self.agents.iter_mut().enumerate() {
            let Ok(id) = u8::try_from(index) else { break };
            let colony = ColonyId(id);
            let view = self.fog.visible_cells(&self.world, colony);
            orders.push((colony, agent.play_turn(&view, turn, &self.world)));
        }

        // Phase 2: resolve
        let report = self.world.resolve_turn(&orders);
        assert_invariants(&self.world);

        self.ants_lost += report.collisions + report.killed;
        self.hills_razed += report.razed;
        self.food_harvested += report.harvested;
        report
    }

    /// Play to the end of the turn budget.
    #[must_use]
    pub fn run(self) -> GameResult {
        self.run_until(|_, _| ControlFlow::Continue(()))
    }

    /// Play until the turn budget is spent or `after_turn` breaks.
    #[must_use]
    pub fn run_until(
        mut self,
        mut after_turn: impl FnMut(&World, &TurnReport) -> ControlFlow<()>,
    ) -> GameResult {
        while !self.is_finished() {
            let report = self.step();
            if after_turn(&self.world, &report).is_break() {
                break;
            }
        }
        self.finish()
    }

    /// Play to the end while publishing a snapshot after every turn.
    #[must_use]
    pub fn run_publishing(self, slot: &SnapshotSlot) -> GameResult {
        slot.publish(self.world.snapshot());
        self.run_until(|world, _| {
            slot.publish(world.snapshot());
            ControlFlow::Continue(())
        })
    }

    /// Tell every agent the final scores, shut them down and build
    /// the result.
    #[must_use]
    pub fn finish(mut self) -> GameResult {
        let colonies = self.world.colony_stats();
        let scores: Vec<i32> = colonies.iter().map(|c| c.score).collect();
        let agents = self.agent_names();
        for agent in &mut self.agents {
            agent.end_game(&scores);
        }

        let winner = winner(&scores);
        info!(
            turns = self.world.turn(),
            winner = ?winner.map(|c| c.0),
            ?scores,
            "game finished"
        );
        GameResult {
            winner,
            scores,
            turns_played: self.world.turn(),
            colonies,
            agents,
            ants_lost: self.ants_lost,
            hills_razed: self.hills_razed,
            food_harvested: self.food_harvested,
            seed: self.seed,
            final_map: self.world.to_map_text(),
        }
    }
}

/// The latest published snapshot, shared between the engine and readers.
///
/// The engine replaces the whole snapshot after each completed turn;
/// readers clone the `Arc` and never see a turn in progress.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSlot {
    inner: Arc<Mutex<Option<Arc<Snapshot>>>>,
}

impl SnapshotSlot {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, snapshot: Arc<Snapshot>) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(snapshot);
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, LazyAgent};
    use crate::game::{Coord, Direction, Occupant, Order, VisibleCell};

    const MAP: &str = "players 2\nrows 6\ncols 12\n\
        m a...........\n\
        m 0...........\n\
        m ............\n\
        m ......b.....\n\
        m ......1.....\n\
        m ............\n";

    fn config(max_turns: u32) -> SessionConfig {
        SessionConfig {
            rules: Rules {
                max_turns,
                food_rate: 0.0,
                initial_food_rounds: 0,
                ..Rules::default()
            },
            ..SessionConfig::default()
        }
    }

    /// Replays a fixed order list and records what it was shown.
    struct Scripted {
        orders: Vec<Order>,
        seen: Arc<Mutex<Vec<(u32, usize)>>>,
    }

    impl Agent for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn play_turn(&mut self, view: &[VisibleCell], turn: u32, _world: &World) -> Vec<Order> {
            self.seen.lock().unwrap().push((turn, view.len()));
            std::mem::take(&mut self.orders)
        }
    }

    #[test]
    fn test_winner() {
        assert_eq!(winner(&[1, 3, 2]), Some(ColonyId(1)));
        assert_eq!(winner(&[3, 3, 2]), None);
        assert_eq!(winner(&[0]), Some(ColonyId(0)));
        assert_eq!(winner(&[]), None);
        assert_eq!(winner(&[-1, -2]), Some(ColonyId(0)));
    }

    #[test]
    fn test_too_many_agents() {
        let specs = vec![AgentSpec::Lazy; 3];
        assert!(matches!(
            Session::new(MAP, &specs, &config(5)),
            Err(SessionError::AgentCount { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_bad_map() {
        assert!(matches!(
            Session::new("players 1\n", &[], &config(5)),
            Err(SessionError::Map(_))
        ));
    }

    #[test]
    fn test_missing_agents_default_to_lazy() {
        let session = Session::new(MAP, &[AgentSpec::Random], &config(5)).unwrap();
        assert_eq!(session.agent_names(), vec!["random", "lazy"]);
    }

    #[test]
    fn test_run_counts_turns() {
        let result = run_game(MAP, &[], &config(7)).unwrap();
        assert_eq!(result.turns_played, 7);
        assert_eq!(result.scores, vec![0, 0]);
        assert_eq!(result.winner, None);
        assert_eq!(result.colonies.len(), 2);
        assert_eq!(result.final_map.colonies(), 2);
    }

    #[test]
    fn test_step_feeds_agents_in_turn_order() {
        let world = World::load(MAP, config(3).rules, 0).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let agent = Scripted {
            orders: vec![Order::new(Coord::new(0, 0), Direction::East)],
            seen: Arc::clone(&seen),
        };
        let mut session = Session::from_parts(world, vec![Box::new(agent), Box::new(LazyAgent)], 0);

        let report = session.step();
        assert_eq!(report.turn, 1);
        assert_eq!(report.moved, 1);
        assert!(matches!(
            session.world().occupant(Coord::new(1, 0)),
            Occupant::Ant { .. }
        ));

        let result = session.run();
        assert_eq!(result.turns_played, 3);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.iter().map(|&(t, _)| t).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(seen.iter().all(|&(_, len)| len > 0));
    }

    #[test]
    fn test_run_until_stops_early() {
        let session = Session::new(MAP, &[], &config(50)).unwrap();
        let result = session.run_until(|world, _| {
            if world.turn() == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(result.turns_played, 4);
    }

    #[test]
    fn test_snapshot_slot_publishes_last_turn() {
        let slot = SnapshotSlot::new();
        assert!(slot.latest().is_none());
        let session = Session::new(MAP, &[], &config(6)).unwrap();
        let reader = slot.clone();
        let _ = session.run_publishing(&slot);
        let snapshot = reader.latest().unwrap();
        assert_eq!(snapshot.turn, 6);
        assert_eq!(snapshot.turns_left, 0);
    }
}
