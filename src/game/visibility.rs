//! Fog of war.
//!
//! A colony sees every cell within the view radius of any of its live
//! ants. Water never changes, so each water cell is announced to a
//! colony only the first time it comes into view.

use crate::game::{ColonyId, Coord, Grid, Occupant, Offset, Terrain, Torus, World};

/// Something a colony can observe on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// Impassable water.
    Water,
    /// A hill with its absolute owner.
    Hill(ColonyId),
    /// A unit of food.
    Food,
    /// A live ant with its absolute owner.
    Ant(ColonyId),
    /// An ant that died there last turn. Map markers have no owner.
    Dead(Option<ColonyId>),
}

/// One reported fact about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCell {
    /// Where.
    pub coord: Coord,
    /// What.
    pub sighting: Sighting,
}

/// Distinct cells currently in view of `colony`, in row-major order.
#[must_use]
pub fn visible_area(world: &World, colony: ColonyId) -> Vec<Coord> {
    let torus = world.torus();
    let offsets = Offset::within(world.rules().view_radius2);
    let mut seen = Grid::filled(torus, false);
    for ant in world.live_ants(colony) {
        for cell in torus.cells_around(ant.position, &offsets) {
            seen[cell] = true;
        }
    }
    seen.iter()
        .filter_map(|(coord, &visible)| visible.then_some(coord))
        .collect()
}

/// Per-colony memory of which water cells have been announced.
#[derive(Debug, Clone)]
pub struct Fog {
    seen_water: Vec<Grid<bool>>,
}

impl Fog {
    /// Fresh fog for `colonies` colonies on `torus`.
    #[must_use]
    pub fn new(torus: Torus, colonies: usize) -> Self {
        Self {
            seen_water: vec![Grid::filled(torus, false); colonies],
        }
    }

    /// Whether `colony` has already been told about water at `coord`.
    #[must_use]
    pub fn has_seen_water(&self, colony: ColonyId, coord: Coord) -> bool {
        self.seen_water
            .get(colony.index())
            .is_some_and(|grid| grid[coord])
    }

    /// Everything `colony` should be told this turn.
    ///
    /// For each visible cell in row-major order this yields the terrain
    /// (water the first time only, hills every time, razed or not), then
    /// any food or ant, then one entry per dead ant logged there.
    pub fn visible_cells(&mut self, world: &World, colony: ColonyId) -> Vec<VisibleCell> {
        let Some(water) = self.seen_water.get_mut(colony.index()) else {
            return Vec::new();
        };

        let mut cells = Vec::new();
        for coord in visible_area(world, colony) {
            let mut report = |sighting| cells.push(VisibleCell { coord, sighting });

            match world.terrain(coord) {
                Terrain::Water if !water[coord] => {
                    water[coord] = true;
                    report(Sighting::Water);
                }
                Terrain::Hill { colony: owner, .. } => report(Sighting::Hill(owner)),
                Terrain::Land | Terrain::Water => {}
            }
            match world.occupant(coord) {
                Occupant::Food => report(Sighting::Food),
                Occupant::Ant { colony: owner, .. } => report(Sighting::Ant(owner)),
                Occupant::Empty => {}
            }
            for dead in world.dead_at(coord) {
                report(Sighting::Dead(dead.colony));
            }
        }
        cells
    }
}
