//! The engine/agent text protocol.
//!
//! Engine to agent, once:
//!
//! ```text
//! turn 0
//! loadtime 3000
//! turntime 1000
//! rows 20
//! cols 30
//! turns 1000
//! viewradius2 55
//! attackradius2 5
//! spawnradius2 1
//! player_seed 42
//! ready
//! ```
//!
//! Engine to agent, every turn: `turn <n>`, one line per sighting
//! (`w`, `f`, `h`, `a`, `d` followed by row, column and, for hills and
//! ants, the owner relative to the reader), then `go`.
//!
//! Agent to engine: `o <row> <col> <n|s|e|w>` lines terminated by `go`.

use std::fmt::Write as _;

use crate::agent::SetupInfo;
use crate::game::{ColonyId, Coord, Direction, Order, Sighting, Torus, VisibleCell};

/// The one-time setup message, newline terminated.
#[must_use]
pub fn setup_message(setup: &SetupInfo) -> String {
    format!(
        "turn 0\n\
         loadtime {}\n\
         turntime {}\n\
         rows {}\n\
         cols {}\n\
         turns {}\n\
         viewradius2 {}\n\
         attackradius2 {}\n\
         spawnradius2 {}\n\
         player_seed {}\n\
         ready\n",
        setup.load_time_ms,
        setup.turn_time_ms,
        setup.rows,
        setup.cols,
        setup.turns,
        setup.view_radius2,
        setup.attack_radius2,
        setup.spawn_radius2,
        setup.player_seed,
    )
}

/// One cell line as seen by `viewer` in a game of `colonies`.
#[must_use]
pub fn cell_line(cell: &VisibleCell, viewer: ColonyId, colonies: usize) -> String {
    let Coord { x: col, y: row } = cell.coord;
    let owner = |colony: ColonyId| colony.relative_to(viewer, colonies);
    match cell.sighting {
        Sighting::Water => format!("w {row} {col}"),
        Sighting::Food => format!("f {row} {col}"),
        Sighting::Hill(colony) => format!("h {row} {col} {}", owner(colony)),
        Sighting::Ant(colony) => format!("a {row} {col} {}", owner(colony)),
        Sighting::Dead(Some(colony)) => format!("d {row} {col} {}", owner(colony)),
        Sighting::Dead(None) => format!("d {row} {col}"),
    }
}

/// The per-turn message, newline terminated.
#[must_use]
pub fn turn_message(turn: u32, view: &[VisibleCell], viewer: ColonyId, colonies: usize) -> String {
    let mut message = format!("turn {turn}\n");
    for cell in view {
        let _ = writeln!(message, "{}", cell_line(cell, viewer, colonies));
    }
    message.push_str("go\n");
    message
}

/// The end-of-game notice, newline terminated.
#[must_use]
pub fn end_message(scores: &[i32]) -> String {
    let scores: Vec<String> = scores.iter().map(ToString::to_string).collect();
    format!("end\nplayers {}\nscore {}\ngo\n", scores.len(), scores.join(" "))
}

/// Whether a reply line ends the agent's turn.
#[must_use]
pub fn is_go(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("go")
}

/// Parse an order line, wrapping its coordinates onto `torus`.
///
/// Anything that is not exactly `o <row> <col> <dir>` is ignored. Only
/// the first letter of the direction token counts.
#[must_use]
pub fn parse_order(line: &str, torus: Torus) -> Option<Order> {
    let line = line.to_ascii_lowercase();
    let mut tokens = line.split_whitespace();
    let (Some("o"), Some(row), Some(col), Some(dir), None) = (
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
    ) else {
        return None;
    };
    let row: i64 = row.parse().ok()?;
    let col: i64 = col.parse().ok()?;
    let direction = Direction::from_letter(dir.chars().next()?)?;
    Some(Order::new(torus.wrap(col, row), direction))
}

/// Render an order as the agent would send it.
#[must_use]
pub fn order_line(order: Order) -> String {
    format!("o {} {} {}", order.from.y, order.from.x, order.direction.letter())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torus() -> Torus {
        Torus::new(10, 8).unwrap()
    }

    fn cell(x: u16, y: u16, sighting: Sighting) -> VisibleCell {
        VisibleCell {
            coord: Coord::new(x, y),
            sighting,
        }
    }

    #[test]
    fn test_setup_message() {
        let setup = SetupInfo {
            colony: ColonyId(0),
            colonies: 2,
            rows: 8,
            cols: 10,
            turns: 500,
            view_radius2: 55,
            attack_radius2: 5,
            spawn_radius2: 1,
            load_time_ms: 3000,
            turn_time_ms: 1000,
            player_seed: 42,
        };
        let message = setup_message(&setup);
        let lines: Vec<_> = message.lines().collect();
        assert_eq!(lines.first(), Some(&"turn 0"));
        assert_eq!(lines.last(), Some(&"ready"));
        assert!(lines.contains(&"rows 8"));
        assert!(lines.contains(&"cols 10"));
        assert!(lines.contains(&"turns 500"));
        assert!(lines.contains(&"player_seed 42"));
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_cell_lines_use_row_col_and_relative_owner() {
        let viewer = ColonyId(1);
        assert_eq!(cell_line(&cell(3, 2, Sighting::Water), viewer, 3), "w 2 3");
        assert_eq!(cell_line(&cell(3, 2, Sighting::Food), viewer, 3), "f 2 3");
        assert_eq!(cell_line(&cell(0, 5, Sighting::Ant(ColonyId(1))), viewer, 3), "a 5 0 0");
        assert_eq!(cell_line(&cell(0, 5, Sighting::Hill(ColonyId(0))), viewer, 3), "h 5 0 2");
        assert_eq!(cell_line(&cell(4, 4, Sighting::Dead(Some(ColonyId(2)))), viewer, 3), "d 4 4 1");
        assert_eq!(cell_line(&cell(4, 4, Sighting::Dead(None)), viewer, 3), "d 4 4");
    }

    #[test]
    fn test_turn_message_framing() {
        let view = [cell(1, 1, Sighting::Food)];
        assert_eq!(turn_message(7, &view, ColonyId(0), 2), "turn 7\nf 1 1\ngo\n");
        assert_eq!(turn_message(1, &[], ColonyId(0), 2), "turn 1\ngo\n");
    }

    #[test]
    fn test_end_message() {
        assert_eq!(end_message(&[3, -1]), "end\nplayers 2\nscore 3 -1\ngo\n");
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(
            parse_order("o 2 3 n", torus()),
            Some(Order::new(Coord::new(3, 2), Direction::North))
        );
        assert_eq!(
            parse_order("  O 2   3 East ", torus()),
            Some(Order::new(Coord::new(3, 2), Direction::East))
        );
        // Coordinates wrap onto the map
        assert_eq!(
            parse_order("o -1 12 w", torus()),
            Some(Order::new(Coord::new(2, 7), Direction::West))
        );
    }

    #[test]
    fn test_parse_order_rejects_malformed() {
        for line in [
            "",
            "# comment",
            "o 1 2",
            "o 1 2 n extra",
            "o a 2 n",
            "o 1 2.5 s",
            "o 1 2 x",
            "m 1 2 n",
            "go",
        ] {
            assert_eq!(parse_order(line, torus()), None, "{line:?}");
        }
    }

    #[test]
    fn test_is_go() {
        assert!(is_go("go"));
        assert!(is_go("GO\r"));
        assert!(is_go("  go "));
        assert!(!is_go("gone"));
        assert!(!is_go("o 1 1 n"));
    }

    #[test]
    fn test_order_line_parses_back() {
        let order = Order::new(Coord::new(4, 6), Direction::South);
        assert_eq!(parse_order(&order_line(order), torus()), Some(order));
    }
}
