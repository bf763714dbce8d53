//! Orders, move validation and collision resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::game::{AntId, ColonyId, Coord, Occupant, Offset, Torus, World};

/// One of the four cardinal steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Row - 1.
    North,
    /// Row + 1.
    South,
    /// Column + 1.
    East,
    /// Column - 1.
    West,
}

impl Direction {
    /// All directions in protocol order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit offset of this step.
    #[must_use]
    pub const fn offset(self) -> Offset {
        match self {
            Direction::North => Offset::new(0, -1),
            Direction::South => Offset::new(0, 1),
            Direction::East => Offset::new(1, 0),
            Direction::West => Offset::new(-1, 0),
        }
    }

    /// Parse a protocol letter (`n`, `s`, `e`, `w`, any case).
    #[must_use]
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'n' => Some(Direction::North),
            's' => Some(Direction::South),
            'e' => Some(Direction::East),
            'w' => Some(Direction::West),
            _ => None,
        }
    }

    /// Protocol letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        }
    }
}

/// A proposed single step for the ant at `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order {
    /// Cell the ant is expected to stand on.
    pub from: Coord,
    /// Step to take.
    pub direction: Direction,
}

impl Order {
    /// Create an order.
    #[must_use]
    pub const fn new(from: Coord, direction: Direction) -> Self {
        Self { from, direction }
    }

    /// Destination cell on `torus`.
    #[must_use]
    pub fn target(self, torus: Torus) -> Coord {
        torus.translate(self.from, self.direction.offset())
    }
}

/// Counts from one movement phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementOutcome {
    /// Ants placed on their destination.
    pub moved: usize,
    /// Ants killed by collisions.
    pub collisions: usize,
}

/// Whether `colony` may carry out `order` on the current grid.
///
/// The step must land one cell away (a step that wraps onto its own
/// origin on a one-wide map does not count), the source must hold a
/// live ant of `colony`, and the target must be neither water nor food.
#[must_use]
pub fn is_valid_order(world: &World, colony: ColonyId, order: Order) -> bool {
    let torus = world.torus;
    let target = order.target(torus);
    let step = torus.distance2(order.from, target);
    if step == 0 || step > 1 {
        return false;
    }
    if world.occupants[order.from].ant_colony() != Some(colony) {
        return false;
    }
    world.terrain[target].is_passable() && world.occupants[target] != Occupant::Food
}

/// Apply every valid order, then settle collisions.
///
/// Orders are validated one at a time against the grid as it is being
/// updated, so an ant that has already left its cell cannot be ordered
/// twice. Once all moving ants are lifted off the grid, each target is
/// settled: a lone ant on a free cell lands there; two or more ants on
/// one cell all die; an ant landing on a stationary ant kills both.
pub fn resolve_movement(world: &mut World, orders: &[(ColonyId, Vec<Order>)]) -> MovementOutcome {
    let torus = world.torus;
    let mut staged: BTreeMap<Coord, Vec<AntId>> = BTreeMap::new();

    for (colony, list) in orders {
        for &order in list {
            if !is_valid_order(world, *colony, order) {
                continue;
            }
            let Occupant::Ant { id, .. } = world.occupants[order.from] else {
                continue;
            };
            world.occupants[order.from] = Occupant::Empty;
            staged.entry(order.target(torus)).or_default().push(id);
        }
    }

    let mut outcome = MovementOutcome::default();
    for (target, mut movers) in staged {
        let stationary = match world.occupants[target] {
            Occupant::Ant { id, .. } => Some(id),
            Occupant::Empty | Occupant::Food => None,
        };

        if let ([id], None) = (movers.as_slice(), stationary) {
            let id = *id;
            let colony = world.ants[id.0 as usize].colony;
            world.ants[id.0 as usize].position = target;
            world.occupants[target] = Occupant::Ant { id, colony };
            outcome.moved += 1;
            continue;
        }

        movers.extend(stationary);
        outcome.collisions += movers.len();
        for id in movers {
            world.kill_ant(id, target);
        }
        world.occupants[target] = Occupant::Empty;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DeadAnt, Rules};

    fn world(text: &str) -> World {
        let rules = Rules {
            food_rate: 0.0,
            initial_food_rounds: 0,
            ..Rules::default()
        };
        World::load(text, rules, 7).unwrap()
    }

    #[test]
    fn test_direction_letters() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_letter(dir.letter()), Some(dir));
            assert_eq!(
                Direction::from_letter(dir.letter().to_ascii_uppercase()),
                Some(dir)
            );
        }
        assert_eq!(Direction::from_letter('x'), None);
    }

    #[test]
    fn test_order_target_wraps() {
        let torus = Torus::new(4, 3).unwrap();
        let order = Order::new(Coord::new(0, 0), Direction::North);
        assert_eq!(order.target(torus), Coord::new(0, 2));
        let order = Order::new(Coord::new(3, 1), Direction::East);
        assert_eq!(order.target(torus), Coord::new(0, 1));
    }

    #[test]
    fn test_validation() {
        let w = world("players 2\nrows 1\ncols 5\nm a%*b.\n");
        let at = |x| Coord::new(x, 0);
        let (c0, c1) = (ColonyId(0), ColonyId(1));

        assert!(!is_valid_order(&w, c0, Order::new(at(0), Direction::East)));
        assert!(is_valid_order(&w, c0, Order::new(at(0), Direction::West)));
        assert!(!is_valid_order(&w, c1, Order::new(at(3), Direction::West)));
        assert!(is_valid_order(&w, c1, Order::new(at(3), Direction::East)));
        // Someone else's ant, and an empty source
        assert!(!is_valid_order(&w, c0, Order::new(at(3), Direction::East)));
        assert!(!is_valid_order(&w, c0, Order::new(at(4), Direction::West)));
        // North wraps onto the ant itself on a one-row map
        assert!(!is_valid_order(&w, c1, Order::new(at(3), Direction::North)));
    }

    #[test]
    fn test_simple_move() {
        let mut w = world("players 1\nrows 1\ncols 3\nm a..\n");
        let outcome = resolve_movement(
            &mut w,
            &[(ColonyId(0), vec![Order::new(Coord::new(0, 0), Direction::East)])],
        );
        assert_eq!(outcome, MovementOutcome { moved: 1, collisions: 0 });
        assert_eq!(w.occupant(Coord::new(0, 0)), Occupant::Empty);
        assert!(matches!(w.occupant(Coord::new(1, 0)), Occupant::Ant { .. }));
        assert_eq!(w.ant(AntId(0)).unwrap().position, Coord::new(1, 0));
    }

    #[test]
    fn test_duplicate_order_dropped() {
        let mut w = world("players 1\nrows 1\ncols 4\nm a...\n");
        let east = Order::new(Coord::new(0, 0), Direction::East);
        let outcome = resolve_movement(&mut w, &[(ColonyId(0), vec![east, east])]);
        assert_eq!(outcome.moved, 1);
        assert!(matches!(w.occupant(Coord::new(1, 0)), Occupant::Ant { .. }));
    }

    #[test]
    fn test_head_on_collision() {
        let mut w = world("players 2\nrows 1\ncols 5\nm a.b..\n");
        let outcome = resolve_movement(
            &mut w,
            &[
                (ColonyId(0), vec![Order::new(Coord::new(0, 0), Direction::East)]),
                (ColonyId(1), vec![Order::new(Coord::new(2, 0), Direction::West)]),
            ],
        );
        assert_eq!(outcome, MovementOutcome { moved: 0, collisions: 2 });
        let middle = Coord::new(1, 0);
        assert_eq!(w.occupant(middle), Occupant::Empty);
        assert_eq!(
            w.dead_at(middle),
            &[
                DeadAnt { colony: Some(ColonyId(0)) },
                DeadAnt { colony: Some(ColonyId(1)) }
            ]
        );
        assert!(w.colony(ColonyId(0)).unwrap().ants.is_empty());
        assert!(w.colony(ColonyId(1)).unwrap().ants.is_empty());
    }

    #[test]
    fn test_follow_the_leader() {
        // The rear ant moves into the cell the front ant vacates
        let mut w = world("players 1\nrows 1\ncols 4\nm aa..\n");
        let outcome = resolve_movement(
            &mut w,
            &[(
                ColonyId(0),
                vec![
                    Order::new(Coord::new(1, 0), Direction::East),
                    Order::new(Coord::new(0, 0), Direction::East),
                ],
            )],
        );
        assert_eq!(outcome.moved, 2);
        assert_eq!(w.occupant(Coord::new(0, 0)), Occupant::Empty);
        assert!(matches!(w.occupant(Coord::new(1, 0)), Occupant::Ant { .. }));
        assert!(matches!(w.occupant(Coord::new(2, 0)), Occupant::Ant { .. }));
    }

    #[test]
    fn test_bump_into_stationary_ant_kills_both() {
        let mut w = world("players 1\nrows 1\ncols 4\nm aa..\n");
        let outcome = resolve_movement(
            &mut w,
            &[(ColonyId(0), vec![Order::new(Coord::new(0, 0), Direction::East)])],
        );
        assert_eq!(outcome.collisions, 2);
        assert_eq!(w.occupant(Coord::new(1, 0)), Occupant::Empty);
        assert_eq!(w.dead_at(Coord::new(1, 0)).len(), 2);
        assert!(w.colony(ColonyId(0)).unwrap().ants.is_empty());
    }
}
