//! Game layer for Anthill.
//!
//! Implements the rules of the toroidal ant battlefield:
//! - Wrapped geometry and fixed-size grids
//! - Terrain, occupants, ants, hills and colonies
//! - The turn pipeline (movement, combat, razing, spawning, food)
//! - Per-colony fog of war
//! - The map text format

mod cell;
mod colony;
mod combat;
mod economy;
mod geometry;
mod grid;
pub mod invariants;
mod map;
mod movement;
mod visibility;
mod world;

pub use cell::{Ant, AntId, DeadAnt, Hill, HillId, MapSymbol, Occupant, Terrain, MAX_COLONIES};
pub use colony::{Colony, ColonyId, INITIAL_HIVE};
pub use combat::{engagements, resolve_combat, threat_counts};
pub use economy::{
    colonies_near, generate_food, harvest_food, raze_hills, spawn_ants, RAZE_PENALTY, RAZE_REWARD,
};
pub use geometry::{Coord, Offset, Torus};
pub use grid::Grid;
pub use map::MapText;
pub use movement::{is_valid_order, resolve_movement, Direction, MovementOutcome, Order};
pub use visibility::{visible_area, Fog, Sighting, VisibleCell};
pub use world::{ColonyStats, Rules, Snapshot, TurnReport, World};
