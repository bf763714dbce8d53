//! World invariants - consistency checks that detect engine bugs.
//!
//! The grid layers, the entity arenas and the colony indexes describe
//! the same world three times over. After every resolved turn they must
//! agree; if they do not, the turn engine has a bug.

use std::collections::HashSet;

use crate::game::{Occupant, Terrain, World};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |message: String| violations.push(InvariantViolation { message });

    // Every live ant stands on a cell that names it
    for ant in world.ants.iter().filter(|a| a.alive) {
        let expected = Occupant::Ant {
            id: ant.id,
            colony: ant.colony,
        };
        if world.occupants[ant.position] != expected {
            report(format!(
                "Live ant {:?} at {:?} not found on the grid",
                ant.id, ant.position
            ));
        }
    }

    // Every ant on the grid is alive and knows where it is
    for (coord, occupant) in world.occupants.iter() {
        if *occupant != Occupant::Empty && world.terrain[coord] == Terrain::Water {
            report(format!("Occupant {occupant:?} on water at {coord:?}"));
        }
        if let Occupant::Ant { id, .. } = *occupant {
            match world.ant(id) {
                Some(ant) if ant.alive && ant.position == coord => {}
                _ => report(format!("Grid holds stale ant {id:?} at {coord:?}")),
            }
        }
    }

    // Colony indexes mirror the arenas
    for colony in &world.colonies {
        let mut indexed = HashSet::new();
        for &id in &colony.ants {
            if !indexed.insert(id) {
                report(format!("Colony {} indexes ant {id:?} twice", colony.id));
            }
        }
        let live: HashSet<_> = world
            .ants
            .iter()
            .filter(|a| a.alive && a.colony == colony.id)
            .map(|a| a.id)
            .collect();
        if indexed != live {
            report(format!(
                "Colony {} indexes {} ants but owns {} live ants",
                colony.id,
                indexed.len(),
                live.len()
            ));
        }

        let active: HashSet<_> = world
            .hills
            .iter()
            .filter(|h| !h.razed && h.colony == colony.id)
            .map(|h| h.id)
            .collect();
        let hills: HashSet<_> = colony.hills.iter().copied().collect();
        if hills != active || hills.len() != colony.hills.len() {
            report(format!("Colony {} hill index out of date", colony.id));
        }
    }

    // Hill terrain matches the arena
    for hill in &world.hills {
        let expected = Terrain::Hill {
            colony: hill.colony,
            razed: hill.razed,
        };
        if world.terrain[hill.position] != expected {
            report(format!("Hill {:?} terrain mismatch at {:?}", hill.id, hill.position));
        }
    }

    // The food list is exactly the food on the grid
    let listed: HashSet<_> = world.food.iter().copied().collect();
    let on_grid: HashSet<_> = world
        .occupants
        .iter()
        .filter(|(_, o)| **o == Occupant::Food)
        .map(|(c, _)| c)
        .collect();
    if listed.len() != world.food.len() {
        report("Food list has duplicates".to_string());
    }
    if listed != on_grid {
        report(format!(
            "Food list has {} entries but grid holds {} food",
            listed.len(),
            on_grid.len()
        ));
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &World) {}
