//! Terrain, occupants and the entities that live on them.

use serde::Serialize;

use crate::game::{ColonyId, Coord};

/// Index of an ant in the world's ant arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AntId(pub u32);

/// Index of a hill in the world's hill arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HillId(pub u32);

/// The static layer of a cell.
///
/// Terrain is fixed at load time. The only transition is a hill being
/// razed, which replaces the whole value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Terrain {
    /// Passable ground.
    Land,
    /// Impassable water.
    Water,
    /// A colony's hill. Razed hills stay on the map as markers.
    Hill {
        /// Owning colony (never changes, even after razing).
        colony: ColonyId,
        /// Whether an enemy has captured this hill.
        razed: bool,
    },
}

impl Terrain {
    /// Whether ants may step onto this cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Terrain::Water)
    }
}

/// The dynamic layer of a cell, rewritten every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Occupant {
    /// Nothing here.
    #[default]
    Empty,
    /// A unit of food. Food blocks movement.
    Food,
    /// A live ant.
    Ant {
        /// Arena index of the ant.
        id: AntId,
        /// Owning colony.
        colony: ColonyId,
    },
}

impl Occupant {
    /// The colony owning the ant here, if any.
    #[must_use]
    pub const fn ant_colony(self) -> Option<ColonyId> {
        match self {
            Occupant::Ant { colony, .. } => Some(colony),
            Occupant::Empty | Occupant::Food => None,
        }
    }
}

/// An ant that died on a cell during the last resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadAnt {
    /// Owning colony; `None` for anonymous markers loaded from a map.
    pub colony: Option<ColonyId>,
}

/// A single ant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ant {
    /// Arena index.
    pub id: AntId,
    /// Current cell.
    pub position: Coord,
    /// Owning colony.
    pub colony: ColonyId,
    /// Cleared when the ant dies; dead ants stay in the arena.
    pub alive: bool,
}

/// A colony's hill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hill {
    /// Arena index.
    pub id: HillId,
    /// Cell the hill sits on. Hills never move.
    pub position: Coord,
    /// Owning colony.
    pub colony: ColonyId,
    /// Set once an enemy ant stands on the hill.
    pub razed: bool,
}

/// Highest colony count the map format can express (`a`-`j`).
pub const MAX_COLONIES: usize = 10;

/// A single character of the map text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSymbol {
    /// `.`
    Land,
    /// `%`
    Water,
    /// `*`
    Food,
    /// `!` - a dead ant marker on land.
    Dead,
    /// `0`-`9` - an unoccupied hill.
    Hill(ColonyId),
    /// `a`-`j` - an ant on land.
    Ant(ColonyId),
    /// `A`-`J` - an ant standing on its own hill.
    AntOnHill(ColonyId),
}

impl MapSymbol {
    /// Decode a map character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        let symbol = match c {
            '.' => MapSymbol::Land,
            '%' => MapSymbol::Water,
            '*' => MapSymbol::Food,
            '!' => MapSymbol::Dead,
            '0'..='9' => MapSymbol::Hill(ColonyId(offset_from(c, '0'))),
            'a'..='j' => MapSymbol::Ant(ColonyId(offset_from(c, 'a'))),
            'A'..='J' => MapSymbol::AntOnHill(ColonyId(offset_from(c, 'A'))),
            _ => return None,
        };
        Some(symbol)
    }

    /// Encode back to the map character.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            MapSymbol::Land => '.',
            MapSymbol::Water => '%',
            MapSymbol::Food => '*',
            MapSymbol::Dead => '!',
            MapSymbol::Hill(colony) => shifted('0', colony),
            MapSymbol::Ant(colony) => shifted('a', colony),
            MapSymbol::AntOnHill(colony) => shifted('A', colony),
        }
    }

    /// The symbol drawn for a cell given both layers and its dead log.
    ///
    /// An ant on its own hill is uppercase; an ant on any other cell
    /// (including an enemy hill) is drawn as a plain ant.
    #[must_use]
    pub fn for_cell(terrain: Terrain, occupant: Occupant, has_dead: bool) -> Self {
        match (terrain, occupant) {
            (Terrain::Hill { colony: hill, .. }, Occupant::Ant { colony, .. }) if hill == colony => {
                MapSymbol::AntOnHill(colony)
            }
            (_, Occupant::Ant { colony, .. }) => MapSymbol::Ant(colony),
            (Terrain::Hill { colony, .. }, _) => MapSymbol::Hill(colony),
            (_, Occupant::Food) => MapSymbol::Food,
            (Terrain::Water, Occupant::Empty) => MapSymbol::Water,
            (Terrain::Land, Occupant::Empty) if has_dead => MapSymbol::Dead,
            (Terrain::Land, Occupant::Empty) => MapSymbol::Land,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn offset_from(c: char, base: char) -> u8 {
    (u32::from(c) - u32::from(base)) as u8
}

fn shifted(base: char, colony: ColonyId) -> char {
    char::from_u32(u32::from(base) + u32::from(colony.0)).unwrap_or('?')
}
