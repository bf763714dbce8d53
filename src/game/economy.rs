//! Hills, spawning and the food economy.
//!
//! Food is the only resource. Harvesting banks one unit of hive credit
//! and every credit becomes a new ant on a free hill of the colony.
//!
//! # Scoring
//!
//! Razing an enemy hill earns the razing colony [`RAZE_REWARD`] points
//! and costs the owner [`RAZE_PENALTY`].

use rand::Rng;

use crate::game::{ColonyId, Coord, Occupant, Offset, Terrain, World};

/// Points gained for razing an enemy hill.
pub const RAZE_REWARD: i32 = 2;

/// Points lost when one of your hills is razed.
pub const RAZE_PENALTY: i32 = 1;

/// Raze every active hill that has an enemy ant standing on it.
///
/// Returns the number of hills razed this turn.
pub fn raze_hills(world: &mut World) -> usize {
    let mut razed = 0;
    for index in 0..world.hills.len() {
        let hill = world.hills[index];
        if hill.razed {
            continue;
        }
        let Some(razer) = world.occupants[hill.position].ant_colony() else {
            continue;
        };
        if razer == hill.colony {
            continue;
        }

        world.hills[index].razed = true;
        world.terrain[hill.position] = Terrain::Hill {
            colony: hill.colony,
            razed: true,
        };
        let owner = &mut world.colonies[hill.colony.index()];
        owner.forget_hill(hill.id);
        owner.score -= RAZE_PENALTY;
        world.colonies[razer.index()].score += RAZE_REWARD;
        razed += 1;
    }
    razed
}

/// Spend hive credit on new ants at free active hills.
///
/// Each colony picks uniformly among its unoccupied hills until it runs
/// out of credit or free hills. Returns the number of ants created.
pub fn spawn_ants(world: &mut World) -> usize {
    let mut spawned = 0;
    for index in 0..world.colonies.len() {
        let colony = world.colonies[index].id;
        let mut free: Vec<Coord> = world.colonies[index]
            .hills
            .iter()
            .map(|&id| world.hills[id.0 as usize].position)
            .filter(|&pos| world.occupants[pos] == Occupant::Empty)
            .collect();

        while !free.is_empty() && world.colonies[index].hive > 0 {
            let pick = world.rng.gen_range(0..free.len());
            let position = free.remove(pick);
            world.place_ant(colony, position);
            world.colonies[index].hive -= 1;
            spawned += 1;
        }
    }
    spawned
}

/// Which colonies have an ant within `radius2` of `coord`.
#[must_use]
pub fn colonies_near(world: &World, coord: Coord, radius2: u32) -> Vec<ColonyId> {
    let mut present: Vec<ColonyId> = world
        .torus
        .within(coord, radius2)
        .into_iter()
        .filter_map(|cell| world.occupants[cell].ant_colony())
        .collect();
    present.sort_unstable();
    present.dedup();
    present
}

/// Let colonies gather uncontested food.
///
/// Food near exactly one colony is eaten and banks one hive credit.
/// Food near two or more colonies, or none, stays. Returns the number
/// of food items eaten.
pub fn harvest_food(world: &mut World) -> usize {
    let radius2 = world.rules.spawn_radius2;
    let food = std::mem::take(&mut world.food);
    let mut remaining = Vec::with_capacity(food.len());
    let mut eaten = 0;

    for coord in food {
        if let [colony] = colonies_near(world, coord, radius2).as_slice() {
            world.occupants[coord] = Occupant::Empty;
            world.colonies[colony.index()].hive += 1;
            eaten += 1;
        } else {
            remaining.push(coord);
        }
    }

    world.food = remaining;
    eaten
}

/// Scatter food with an expected `density` units per call.
///
/// Each unit picks a land cell relative to the first hill and copies it
/// to the same relative position around every hill, vertically mirrored
/// for hills in the lower half when the map is symmetric. Returns the
/// number of food items placed.
pub fn generate_food(world: &mut World, density: f64) -> usize {
    let Some(reference) = world.hills.first().map(|h| h.position) else {
        return 0;
    };
    let torus = world.torus;
    let attempts = torus.area() * 4;
    let mut placed = 0;

    let mut budget = density - world.rng.r#gen::<f64>();
    while budget >= 0.0 {
        let offset = (0..attempts).find_map(|_| {
            let offset = Offset::new(
                world.rng.gen_range(0..i32::from(torus.width())),
                world.rng.gen_range(0..i32::from(torus.height())),
            );
            (world.terrain[torus.translate(reference, offset)] == Terrain::Land).then_some(offset)
        });

        if let Some(offset) = offset {
            let mirrored = if world.rules.symmetric {
                Offset::new(offset.dx, -offset.dy)
            } else {
                offset
            };
            for index in 0..world.hills.len() {
                let hill = world.hills[index].position;
                let step = if hill.y < torus.height() / 2 { offset } else { mirrored };
                let target = torus.translate(hill, step);
                if world.terrain[target] == Terrain::Land && world.occupants[target] == Occupant::Empty {
                    world.occupants[target] = Occupant::Food;
                    world.food.push(target);
                    placed += 1;
                }
            }
        }

        budget -= world.rng.r#gen::<f64>();
    }
    placed
}
