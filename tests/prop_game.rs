//! Property-based tests for game mechanics.
//!
//! These tests verify properties of geometry, movement, combat, fog and
//! the wire protocol.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use anthill::agent::protocol::{order_line, parse_order};
use anthill::game::invariants::check_invariants;
use anthill::game::{
    harvest_food, resolve_combat, resolve_movement, Fog, MapText, Occupant, Sighting, Terrain,
};
use anthill::{ColonyId, Coord, Direction, Order, Rules, Torus, World};

fn quiet_rules() -> Rules {
    Rules {
        food_rate: 0.0,
        initial_food_rounds: 0,
        ..Rules::default()
    }
}

/// Lay `cells` out row by row into map text.
fn map_text(players: usize, cols: usize, rows: usize, cells: &[char]) -> String {
    let mut text = format!("players {players}\nrows {rows}\ncols {cols}\n");
    for row in cells.chunks(cols).take(rows) {
        text.push_str("m ");
        text.extend(row);
        text.push('\n');
    }
    text
}

fn cell_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['.', '.', '.', '%', '*', 'a', 'b', 'c'])
}

/// One order per live ant, directions drawn from `dirs`.
fn orders_for(world: &World, dirs: &[usize]) -> Vec<(ColonyId, Vec<Order>)> {
    let mut orders: Vec<(ColonyId, Vec<Order>)> =
        world.colonies().iter().map(|c| (c.id, Vec::new())).collect();
    for (i, ant) in world.all_live_ants().enumerate() {
        let direction = Direction::ALL[dirs[i % dirs.len()]];
        orders[ant.colony.index()].1.push(Order::new(ant.position, direction));
    }
    orders
}

fn colony_layer(world: &World) -> Vec<Option<ColonyId>> {
    world
        .torus()
        .coords()
        .map(|c| world.occupant(c).ant_colony())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Squared torus distance is symmetric and matches the shortest
    /// wrapped Euclidean distance.
    #[test]
    fn prop_distance_symmetric(
        width in 1u16..40,
        height in 1u16..40,
        ax in 0u16..40, ay in 0u16..40,
        bx in 0u16..40, by in 0u16..40
    ) {
        let torus = Torus::new(width, height).unwrap();
        let a = Coord::new(ax % width, ay % height);
        let b = Coord::new(bx % width, by % height);

        let d = torus.distance2(a, b);
        prop_assert_eq!(d, torus.distance2(b, a));

        let dx = u32::from(a.x.abs_diff(b.x));
        let dy = u32::from(a.y.abs_diff(b.y));
        let dx = dx.min(u32::from(width) - dx);
        let dy = dy.min(u32::from(height) - dy);
        prop_assert_eq!(d, dx * dx + dy * dy);
    }

    /// Wrapping any integer pair lands on the torus.
    #[test]
    fn prop_wrap_in_bounds(
        width in 1u16..50,
        height in 1u16..50,
        x in -10_000i64..10_000,
        y in -10_000i64..10_000
    ) {
        let torus = Torus::new(width, height).unwrap();
        let c = torus.wrap(x, y);
        prop_assert!(c.x < width && c.y < height);
        prop_assert_eq!(torus.wrap(x + i64::from(width), y - i64::from(height)), c);
    }

    /// The result of movement does not depend on the order colonies or
    /// ants are listed in.
    #[test]
    fn prop_movement_order_independent(
        cols in 3usize..8,
        rows in 3usize..8,
        cells in prop::collection::vec(cell_strategy(), 64),
        dirs in prop::collection::vec(0usize..4, 1..16)
    ) {
        let text = map_text(3, cols, rows, &cells);
        let mut forward = World::load(&text, quiet_rules(), 1).unwrap();
        let mut backward = forward.clone();

        let orders = orders_for(&forward, &dirs);
        let mut reversed = orders.clone();
        reversed.reverse();
        for (_, list) in &mut reversed {
            list.reverse();
        }

        let a = resolve_movement(&mut forward, &orders);
        let b = resolve_movement(&mut backward, &reversed);
        prop_assert_eq!(a, b);
        prop_assert_eq!(colony_layer(&forward), colony_layer(&backward));
        prop_assert!(check_invariants(&forward).is_empty());
    }

    /// Two lone enemies in range kill each other; out of range both live.
    #[test]
    fn prop_duel_is_a_tie(dx in -3i32..=3, dy in -3i32..=3) {
        prop_assume!(dx != 0 || dy != 0);
        let mut cells = vec!['.'; 81];
        cells[4 * 9 + 4] = 'a';
        let bx = usize::try_from(4 + dx).unwrap();
        let by = usize::try_from(4 + dy).unwrap();
        cells[by * 9 + bx] = 'b';
        let mut world = World::load(&map_text(2, 9, 9, &cells), quiet_rules(), 1).unwrap();

        let killed = resolve_combat(&mut world);
        let in_range = u32::try_from(dx * dx + dy * dy).unwrap() <= world.rules().attack_radius2;
        prop_assert_eq!(killed, if in_range { 2 } else { 0 });
        prop_assert!(check_invariants(&world).is_empty());
    }

    /// Food next to exactly one colony is gathered; contested food stays.
    #[test]
    fn prop_harvest_needs_a_single_colony(bx in 0usize..7, by in 0usize..7) {
        let food = 3 * 7 + 4;
        let b = by * 7 + bx;
        prop_assume!(b != 3 * 7 + 3 && b != food);
        let mut cells = vec!['.'; 49];
        cells[3 * 7 + 3] = 'a';
        cells[food] = '*';
        cells[b] = 'b';
        let mut world = World::load(&map_text(2, 7, 7, &cells), quiet_rules(), 1).unwrap();

        let food = Coord::new(4, 3);
        let contested = world
            .torus()
            .distance2(Coord::new(u16::try_from(bx).unwrap(), u16::try_from(by).unwrap()), food)
            <= world.rules().spawn_radius2;
        let gathered = harvest_food(&mut world);

        prop_assert_eq!(gathered, usize::from(!contested));
        prop_assert_eq!(world.occupant(food) == Occupant::Food, contested);
        let hive = world.colony(ColonyId(0)).unwrap().hive;
        prop_assert_eq!(hive, if contested { 1 } else { 2 });
        prop_assert_eq!(world.colony(ColonyId(1)).unwrap().hive, 1);
        prop_assert!(check_invariants(&world).is_empty());
    }

    /// Water is announced once, however often the colony looks.
    #[test]
    fn prop_fog_reports_water_once(
        cells in prop::collection::vec(prop::sample::select(vec!['.', '%', '*']), 36)
    ) {
        let mut cells = cells;
        cells[0] = 'a';
        let world = World::load(&map_text(1, 6, 6, &cells), quiet_rules(), 1).unwrap();
        let water = world
            .torus()
            .coords()
            .filter(|&c| world.terrain(c) == Terrain::Water)
            .count();

        let mut fog = Fog::new(world.torus(), 1);
        let first = fog.visible_cells(&world, ColonyId(0));
        let second = fog.visible_cells(&world, ColonyId(0));
        let count = |view: &[anthill::game::VisibleCell]| {
            view.iter().filter(|c| c.sighting == Sighting::Water).count()
        };
        prop_assert_eq!(count(&first), water);
        prop_assert_eq!(count(&second), 0);
    }

    /// Order parsing never panics on arbitrary input.
    #[test]
    fn prop_parse_order_no_panic(line in ".{0,40}") {
        let torus = Torus::new(10, 10).unwrap();
        let _ = parse_order(&line, torus);
    }

    /// Rendered orders parse back to themselves.
    #[test]
    fn prop_order_line_parses_back(x in 0u16..30, y in 0u16..20, dir in 0usize..4) {
        let torus = Torus::new(30, 20).unwrap();
        let order = Order::new(Coord::new(x, y), Direction::ALL[dir]);
        prop_assert_eq!(parse_order(&order_line(order), torus), Some(order));
    }

    /// Map parsing never panics on arbitrary input.
    #[test]
    fn prop_map_parse_no_panic(text in "(players [0-9]\n|rows [0-9]\n|cols [0-9]\n|m [.%*!0-9a-jA-J]{0,6}\n|[^\n]{0,8}\n){0,12}") {
        let _ = MapText::parse(&text);
    }
}
