#![no_main]

//! Full game turn fuzzer.
//!
//! This fuzz target exercises the complete turn pipeline on a small
//! generated map:
//! 1. Validate and apply orders
//! 2. Settle collisions
//! 3. Resolve combat
//! 4. Raze hills, spawn ants, harvest and grow food
//!
//! The world invariants are checked after every turn.

use anthill::game::invariants::check_invariants;
use anthill::game::MapSymbol;
use anthill::{ColonyId, Coord, Direction, Rules, World};
use anthill::{MapText, Order};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated order.
#[derive(Arbitrary, Debug, Clone)]
struct FuzzOrder {
    colony: u8,
    x: u8,
    y: u8,
    direction: u8,
}

/// Structured input for full game turn fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    /// Map width and height, capped below.
    size: (u8, u8),
    /// Cell symbols, cycled over the map.
    cells: Vec<u8>,
    /// Orders per turn.
    turns: Vec<Vec<FuzzOrder>>,
    /// World seed.
    seed: u64,
    /// Mirror food generation.
    symmetric: bool,
}

const ALPHABET: &[u8] = b"....%*!0123abcdABCD";

fuzz_target!(|input: GameTurnInput| {
    let cols = usize::from(input.size.0 % 12) + 1;
    let rows = usize::from(input.size.1 % 12) + 1;
    if input.cells.is_empty() {
        return;
    }

    let mut text = format!("players 4\nrows {rows}\ncols {cols}\n");
    for y in 0..rows {
        text.push_str("m ");
        for x in 0..cols {
            let byte = input.cells[(y * cols + x) % input.cells.len()];
            text.push(char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]));
        }
        text.push('\n');
    }

    let map = MapText::parse(&text).expect("generated map must parse");
    assert!(map.symbols().iter().all(|(_, s)| MapSymbol::from_char(s.to_char()) == Some(*s)));

    let rules = Rules {
        max_turns: 20,
        symmetric: input.symmetric,
        ..Rules::default()
    };
    let mut world = World::from_map(&map, rules, input.seed);
    world.populate();
    assert!(check_invariants(&world).is_empty());

    for turn in input.turns.iter().take(20) {
        world.begin_turn();
        let mut orders: Vec<(ColonyId, Vec<Order>)> =
            (0..4).map(|c| (ColonyId(c), Vec::new())).collect();
        for order in turn.iter().take(64) {
            let colony = usize::from(order.colony % 4);
            let from = Coord::new(u16::from(order.x) % cols as u16, u16::from(order.y) % rows as u16);
            let direction = Direction::ALL[usize::from(order.direction % 4)];
            orders[colony].1.push(Order::new(from, direction));
        }

        let _ = world.resolve_turn(&orders);
        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
    }
});
