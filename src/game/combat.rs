//! Combat resolution.
//!
//! Every live ant counts the enemies inside its attack radius. An ant
//! dies when some enemy in range is engaged with no more ants than it
//! is, so evenly matched fights destroy both sides and focused numbers
//! win without losses.

use std::collections::HashMap;

use crate::game::{AntId, Occupant, Offset, World};

/// Enemy ants within attack range of each live ant.
///
/// The threat count of an ant is the length of its list. All lists are
/// taken from the same grid state.
#[must_use]
pub fn engagements(world: &World) -> HashMap<AntId, Vec<AntId>> {
    let offsets = Offset::within(world.rules.attack_radius2);
    world
        .all_live_ants()
        .map(|ant| {
            let enemies = world
                .torus
                .cells_around(ant.position, &offsets)
                .into_iter()
                .filter_map(|cell| match world.occupants[cell] {
                    Occupant::Ant { id, colony } if colony != ant.colony => Some(id),
                    _ => None,
                })
                .collect();
            (ant.id, enemies)
        })
        .collect()
}

/// Threat count of every live ant.
#[must_use]
pub fn threat_counts(world: &World) -> HashMap<AntId, usize> {
    engagements(world)
        .into_iter()
        .map(|(id, enemies)| (id, enemies.len()))
        .collect()
}

/// Kill every ant that loses its fight. Returns the number killed.
///
/// Deaths are decided for all ants before any of them is removed.
pub fn resolve_combat(world: &mut World) -> usize {
    let engaged = engagements(world);
    let threat = |id: &AntId| engaged.get(id).map_or(0, Vec::len);

    let mut doomed: Vec<AntId> = engaged
        .iter()
        .filter(|&(id, enemies)| enemies.iter().any(|e| threat(e) <= threat(id)))
        .map(|(&id, _)| id)
        .collect();
    doomed.sort_unstable();

    for &id in &doomed {
        let Some(position) = world.ant(id).map(|a| a.position) else {
            continue;
        };
        world.occupants[position] = Occupant::Empty;
        world.kill_ant(id, position);
    }
    doomed.len()
}
