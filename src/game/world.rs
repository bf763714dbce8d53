//! World state and the per-turn pipeline.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::MapError;
use crate::game::{
    generate_food, harvest_food, raze_hills, resolve_combat, resolve_movement, spawn_ants, Ant,
    AntId, Colony, ColonyId, Coord, DeadAnt, Grid, Hill, HillId, MapSymbol, MapText, Occupant,
    Order, Terrain, Torus,
};

/// Gameplay constants for one game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    /// Squared radius an ant can see.
    pub view_radius2: u32,
    /// Squared radius in which enemy ants threaten each other.
    pub attack_radius2: u32,
    /// Squared radius in which an ant gathers food.
    pub spawn_radius2: u32,
    /// Turn budget.
    pub max_turns: u32,
    /// Mirror food vertically for hills in the lower half of the map.
    pub symmetric: bool,
    /// Expected new food per turn.
    pub food_rate: f64,
    /// Rounds of food (density 1.0 each) scattered before turn 1.
    pub initial_food_rounds: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            view_radius2: 55,
            attack_radius2: 5,
            spawn_radius2: 1,
            max_turns: 1000,
            symmetric: false,
            food_rate: 0.3,
            initial_food_rounds: 3,
        }
    }
}

/// What happened during one resolved turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    /// Turn number.
    pub turn: u32,
    /// Ants that completed a move.
    pub moved: usize,
    /// Ants lost to collisions.
    pub collisions: usize,
    /// Ants lost in combat.
    pub killed: usize,
    /// Hills razed.
    pub razed: usize,
    /// Ants spawned on hills.
    pub spawned: usize,
    /// Food items harvested.
    pub harvested: usize,
    /// Food items placed.
    pub food_spawned: usize,
}

/// Per-colony summary for readers and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColonyStats {
    /// Colony id.
    pub colony: ColonyId,
    /// Live ants.
    pub ants: usize,
    /// Active (unrazed) hills.
    pub hills: usize,
    /// Banked spawn credit.
    pub hive: u32,
    /// Score.
    pub score: i32,
}

/// An immutable copy of the world published after a turn completes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Turn that produced this snapshot.
    pub turn: u32,
    /// Turns remaining.
    pub turns_left: u32,
    /// Terrain layer.
    pub terrain: Grid<Terrain>,
    /// Occupant layer.
    pub occupants: Grid<Occupant>,
    /// Colony summaries in id order.
    pub colonies: Vec<ColonyStats>,
}

/// The complete game state.
///
/// The turn engine is the only writer. Fields are visible inside the
/// `game` module so each pipeline step can live in its own file.
#[derive(Debug, Clone)]
pub struct World {
    pub(super) torus: Torus,
    pub(super) rules: Rules,
    pub(super) turn: u32,
    pub(super) turns_left: u32,
    pub(super) terrain: Grid<Terrain>,
    pub(super) occupants: Grid<Occupant>,
    pub(super) dead: Grid<Vec<DeadAnt>>,
    pub(super) colonies: Vec<Colony>,
    pub(super) ants: Vec<Ant>,
    pub(super) hills: Vec<Hill>,
    pub(super) food: Vec<Coord>,
    pub(super) rng: ChaCha8Rng,
}

impl World {
    /// Parse map text and build a world from it.
    ///
    /// # Errors
    ///
    /// Returns a [`MapError`] if the map text is malformed.
    pub fn load(text: &str, rules: Rules, seed: u64) -> Result<Self, MapError> {
        let map = MapText::parse(text)?;
        Ok(Self::from_map(&map, rules, seed))
    }

    /// Build a world from a parsed map.
    #[must_use]
    pub fn from_map(map: &MapText, rules: Rules, seed: u64) -> Self {
        let torus = map.torus();
        #[allow(clippy::cast_possible_truncation)]
        let colonies = (0..map.colonies())
            .map(|i| Colony::new(ColonyId(i as u8)))
            .collect();

        let mut world = Self {
            torus,
            rules,
            turn: 0,
            turns_left: rules.max_turns,
            terrain: Grid::filled(torus, Terrain::Land),
            occupants: Grid::with_default(torus),
            dead: Grid::with_default(torus),
            colonies,
            ants: Vec::new(),
            hills: Vec::new(),
            food: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };

        for (coord, &symbol) in map.symbols().iter() {
            match symbol {
                MapSymbol::Land => {}
                MapSymbol::Water => world.terrain[coord] = Terrain::Water,
                MapSymbol::Food => {
                    world.occupants[coord] = Occupant::Food;
                    world.food.push(coord);
                }
                MapSymbol::Dead => world.dead[coord].push(DeadAnt { colony: None }),
                MapSymbol::Hill(colony) => world.add_hill(colony, coord),
                MapSymbol::Ant(colony) => {
                    world.place_ant(colony, coord);
                }
                MapSymbol::AntOnHill(colony) => {
                    world.add_hill(colony, coord);
                    world.place_ant(colony, coord);
                }
            }
        }

        world
    }

    fn add_hill(&mut self, colony: ColonyId, position: Coord) {
        #[allow(clippy::cast_possible_truncation)]
        let id = HillId(self.hills.len() as u32);
        self.hills.push(Hill {
            id,
            position,
            colony,
            razed: false,
        });
        self.terrain[position] = Terrain::Hill {
            colony,
            razed: false,
        };
        self.colonies[colony.index()].hills.push(id);
    }

    /// Create a live ant at `position` and index it under its colony.
    pub(super) fn place_ant(&mut self, colony: ColonyId, position: Coord) -> AntId {
        #[allow(clippy::cast_possible_truncation)]
        let id = AntId(self.ants.len() as u32);
        self.ants.push(Ant {
            id,
            position,
            colony,
            alive: true,
        });
        self.occupants[position] = Occupant::Ant { id, colony };
        self.colonies[colony.index()].ants.push(id);
        id
    }

    /// Mark an ant dead at `at` and log it there.
    ///
    /// The occupant layer is left alone; callers decide what the cell
    /// holds afterwards.
    pub(super) fn kill_ant(&mut self, id: AntId, at: Coord) {
        let Some(ant) = self.ants.get_mut(id.0 as usize) else {
            return;
        };
        if !ant.alive {
            return;
        }
        ant.alive = false;
        ant.position = at;
        let colony = ant.colony;
        self.colonies[colony.index()].forget_ant(id);
        self.dead[at].push(DeadAnt {
            colony: Some(colony),
        });
    }

    /// Scatter the initial food and spawn the first ants.
    ///
    /// Call once before turn 1.
    pub fn populate(&mut self) {
        for _ in 0..self.rules.initial_food_rounds {
            generate_food(self, 1.0);
        }
        spawn_ants(self);
    }

    /// Start a new turn: bump the counter and spend one turn of budget.
    pub fn begin_turn(&mut self) {
        self.turn += 1;
        self.turns_left = self.turns_left.saturating_sub(1);
    }

    /// Resolve a turn from the orders collected for it.
    ///
    /// Orders are applied colony by colony in the order given. The
    /// dead log from the previous turn is discarded first.
    pub fn resolve_turn(&mut self, orders: &[(ColonyId, Vec<Order>)]) -> TurnReport {
        self.clear_dead();

        let movement = resolve_movement(self, orders);
        let killed = resolve_combat(self);
        let razed = raze_hills(self);
        let spawned = spawn_ants(self);
        let harvested = harvest_food(self);
        let food_spawned = generate_food(self, self.rules.food_rate);

        let report = TurnReport {
            turn: self.turn,
            moved: movement.moved,
            collisions: movement.collisions,
            killed,
            razed,
            spawned,
            harvested,
            food_spawned,
        };
        debug!(?report, "turn resolved");
        report
    }

    /// Forget every dead-ant record.
    pub fn clear_dead(&mut self) {
        for log in self.dead.values_mut() {
            log.clear();
        }
    }

    /// Map dimensions.
    #[must_use]
    pub const fn torus(&self) -> Torus {
        self.torus
    }

    /// Gameplay constants.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Current turn number (0 before the first turn).
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Turns left in the budget.
    #[must_use]
    pub const fn turns_left(&self) -> u32 {
        self.turns_left
    }

    /// Whether the turn budget is spent.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.turns_left == 0
    }

    /// Terrain at `coord`.
    #[must_use]
    pub fn terrain(&self, coord: Coord) -> Terrain {
        self.terrain[coord]
    }

    /// Occupant at `coord`.
    #[must_use]
    pub fn occupant(&self, coord: Coord) -> Occupant {
        self.occupants[coord]
    }

    /// Ants that died at `coord` during the last resolved turn.
    #[must_use]
    pub fn dead_at(&self, coord: Coord) -> &[DeadAnt] {
        &self.dead[coord]
    }

    /// All colonies in id order.
    #[must_use]
    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    /// Number of colonies.
    #[must_use]
    pub fn colony_count(&self) -> usize {
        self.colonies.len()
    }

    /// Look up a colony.
    #[must_use]
    pub fn colony(&self, id: ColonyId) -> Option<&Colony> {
        self.colonies.get(id.index())
    }

    /// Mutable access to a colony's counters.
    #[must_use]
    pub fn colony_mut(&mut self, id: ColonyId) -> Option<&mut Colony> {
        self.colonies.get_mut(id.index())
    }

    /// Look up an ant, alive or dead.
    #[must_use]
    pub fn ant(&self, id: AntId) -> Option<&Ant> {
        self.ants.get(id.0 as usize)
    }

    /// Live ants of one colony.
    pub fn live_ants(&self, colony: ColonyId) -> impl Iterator<Item = &Ant> {
        self.colony(colony)
            .into_iter()
            .flat_map(|c| c.ants.iter())
            .filter_map(|&id| self.ant(id))
    }

    /// Live ants of every colony, in colony order.
    pub fn all_live_ants(&self) -> impl Iterator<Item = &Ant> {
        self.colonies
            .iter()
            .flat_map(|c| c.ants.iter())
            .filter_map(|&id| self.ant(id))
    }

    /// Every hill, razed or not, in load order.
    #[must_use]
    pub fn hills(&self) -> &[Hill] {
        &self.hills
    }

    /// Coordinates of food on the map.
    #[must_use]
    pub fn food(&self) -> &[Coord] {
        &self.food
    }

    /// Per-colony summaries.
    #[must_use]
    pub fn colony_stats(&self) -> Vec<ColonyStats> {
        self.colonies
            .iter()
            .map(|c| ColonyStats {
                colony: c.id,
                ants: c.ants.len(),
                hills: c.hills.len(),
                hive: c.hive,
                score: c.score,
            })
            .collect()
    }

    /// Copy the readable state for another thread.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::new(Snapshot {
            turn: self.turn,
            turns_left: self.turns_left,
            terrain: self.terrain.clone(),
            occupants: self.occupants.clone(),
            colonies: self.colony_stats(),
        })
    }

    /// Render the current state in map text form.
    ///
    /// The format is lossy. A cell holds one symbol, so a hill covered by
    /// an enemy ant is written as that ant and the hill is gone on
    /// reload. There is no symbol for a razed hill either; uncovered
    /// razed hills reload as active ones.
    #[must_use]
    pub fn to_map_text(&self) -> MapText {
        let mut symbols = Grid::filled(self.torus, MapSymbol::Land);
        for coord in self.torus.coords() {
            symbols[coord] = MapSymbol::for_cell(
                self.terrain[coord],
                self.occupants[coord],
                !self.dead[coord].is_empty(),
            );
        }
        MapText::from_parts(self.colonies.len(), symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    const MAP: &str = "players 2\nrows 3\ncols 4\nm a..1\nm .%*.\nm 0!.B\n";

    fn quiet_rules() -> Rules {
        Rules {
            food_rate: 0.0,
            initial_food_rounds: 0,
            ..Rules::default()
        }
    }

    #[test]
    fn test_load_builds_entities() {
        let world = World::load(MAP, quiet_rules(), 1).unwrap();
        assert_eq!(world.colony_count(), 2);
        assert_eq!(world.hills().len(), 3);
        assert_eq!(world.colony(ColonyId(1)).unwrap().hills.len(), 2);
        assert_eq!(world.food(), &[Coord::new(2, 1)]);
        assert_eq!(world.terrain(Coord::new(1, 1)), Terrain::Water);
        assert_eq!(world.dead_at(Coord::new(1, 2)), &[DeadAnt { colony: None }]);

        let ants0: Vec<_> = world.live_ants(ColonyId(0)).map(|a| a.position).collect();
        let ants1: Vec<_> = world.live_ants(ColonyId(1)).map(|a| a.position).collect();
        assert_eq!(ants0, vec![Coord::new(0, 0)]);
        assert_eq!(ants1, vec![Coord::new(3, 2)]);
        assert_eq!(
            world.terrain(Coord::new(3, 2)),
            Terrain::Hill {
                colony: ColonyId(1),
                razed: false
            }
        );
    }

    #[test]
    fn test_turn_budget() {
        let rules = Rules {
            max_turns: 2,
            ..quiet_rules()
        };
        let mut world = World::load(MAP, rules, 1).unwrap();
        assert!(!world.is_finished());
        world.begin_turn();
        world.begin_turn();
        assert_eq!(world.turn(), 2);
        assert!(world.is_finished());
        world.begin_turn();
        assert_eq!(world.turns_left(), 0);
    }

    #[test]
    fn test_populate_spawns_on_empty_hills() {
        let mut world = World::load(MAP, quiet_rules(), 1).unwrap();
        world.populate();
        // One hive credit each, and each colony has an empty hill
        assert_eq!(world.live_ants(ColonyId(0)).count(), 2);
        assert_eq!(world.live_ants(ColonyId(1)).count(), 2);
        assert_eq!(world.colony(ColonyId(0)).unwrap().hive, 0);
        assert_eq!(world.colony(ColonyId(1)).unwrap().hive, 0);
        assert!(matches!(
            world.occupant(Coord::new(0, 2)),
            Occupant::Ant { colony: ColonyId(0), .. }
        ));
    }

    #[test]
    fn test_dead_log_cleared_each_turn() {
        let mut world = World::load(MAP, quiet_rules(), 1).unwrap();
        world.begin_turn();
        world.resolve_turn(&[]);
        assert!(world.dead_at(Coord::new(1, 2)).is_empty());
    }

    #[test]
    fn test_map_text_round_trip() {
        let world = World::load(MAP, quiet_rules(), 1).unwrap();
        let text = world.to_map_text().to_string();
        assert_eq!(MapText::parse(&text).unwrap(), MapText::parse(MAP).unwrap());
    }

    #[test]
    fn test_map_text_loses_covered_and_razed_hills() {
        let mut world = World::load("players 2\nrows 1\ncols 5\nm b0..1\n", quiet_rules(), 1).unwrap();
        world.begin_turn();
        let order = Order::new(Coord::new(0, 0), Direction::East);
        let report = world.resolve_turn(&[(ColonyId(0), Vec::new()), (ColonyId(1), vec![order])]);
        assert_eq!(report.razed, 1);

        let text = world.to_map_text();
        assert_eq!(text.symbols().at(1, 0), &MapSymbol::Ant(ColonyId(1)));
        let reloaded = World::from_map(&text, quiet_rules(), 1);
        assert_eq!(world.hills().len(), 2);
        assert_eq!(reloaded.hills().len(), 1);
        assert!(reloaded.hills().iter().all(|h| !h.razed));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut world = World::load(MAP, quiet_rules(), 1).unwrap();
        let snapshot = world.snapshot();
        world.begin_turn();
        let east = Order::new(Coord::new(0, 0), Direction::East);
        world.resolve_turn(&[(ColonyId(0), vec![east])]);
        assert_eq!(snapshot.turn, 0);
        assert!(matches!(snapshot.occupants[Coord::new(0, 0)], Occupant::Ant { .. }));
        assert_eq!(world.occupant(Coord::new(0, 0)), Occupant::Empty);
    }
}
