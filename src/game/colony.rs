//! Colony bookkeeping.

use serde::Serialize;

use crate::game::{AntId, HillId};

/// Dense colony index in `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColonyId(pub u8);

impl ColonyId {
    /// Index into per-colony tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// This colony's id as seen by `viewer`, where the viewer is always 0.
    #[must_use]
    pub fn relative_to(self, viewer: ColonyId, colonies: usize) -> usize {
        (self.index() + colonies - viewer.index()) % colonies
    }
}

impl std::fmt::Display for ColonyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spawn credit every colony starts with.
pub const INITIAL_HIVE: u32 = 1;

/// One competing faction.
///
/// The `ants` and `hills` lists are an index maintained by the world;
/// the ant and hill arenas are the source of truth.
#[derive(Debug, Clone)]
pub struct Colony {
    /// Colony id.
    pub id: ColonyId,
    /// Live ants owned by this colony.
    pub ants: Vec<AntId>,
    /// Hills that have not been razed.
    pub hills: Vec<HillId>,
    /// Banked spawn credit.
    pub hive: u32,
    /// Accumulated score.
    pub score: i32,
}

impl Colony {
    /// Create an empty colony.
    #[must_use]
    pub fn new(id: ColonyId) -> Self {
        Self {
            id,
            ants: Vec::new(),
            hills: Vec::new(),
            hive: INITIAL_HIVE,
            score: 0,
        }
    }

    /// Drop an ant from the live index.
    pub fn forget_ant(&mut self, ant: AntId) {
        self.ants.retain(|&id| id != ant);
    }

    /// Drop a hill from the active index.
    pub fn forget_hill(&mut self, hill: HillId) {
        self.hills.retain(|&id| id != hill);
    }

    /// A colony with no ants and no active hills can never act again.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.ants.is_empty() && self.hills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_ids() {
        assert_eq!(ColonyId(0).relative_to(ColonyId(0), 3), 0);
        assert_eq!(ColonyId(2).relative_to(ColonyId(0), 3), 2);
        assert_eq!(ColonyId(0).relative_to(ColonyId(2), 3), 1);
        assert_eq!(ColonyId(1).relative_to(ColonyId(2), 3), 2);
    }

    #[test]
    fn test_colony_creation() {
        let colony = Colony::new(ColonyId(1));
        assert_eq!(colony.hive, INITIAL_HIVE);
        assert_eq!(colony.score, 0);
        assert!(colony.is_extinct());
    }

    #[test]
    fn test_forget() {
        let mut colony = Colony::new(ColonyId(0));
        colony.ants = vec![AntId(1), AntId(2), AntId(3)];
        colony.hills = vec![HillId(0)];
        colony.forget_ant(AntId(2));
        colony.forget_hill(HillId(0));
        assert_eq!(colony.ants, vec![AntId(1), AntId(3)]);
        assert!(colony.hills.is_empty());
        assert!(!colony.is_extinct());
    }
}
