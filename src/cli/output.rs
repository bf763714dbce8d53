//! Output formatting utilities for CLI.

use anthill::GameResult;
use serde::Serialize;
use std::fmt::Write;

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Winning colony (null if draw).
    pub(super) winner: Option<u8>,
    /// Total turns played.
    pub(super) turns_played: u32,
    /// Ants lost to collisions and combat.
    pub(super) ants_lost: usize,
    /// Hills razed.
    pub(super) hills_razed: usize,
    /// Food harvested.
    pub(super) food_harvested: usize,
    /// Per-colony results.
    pub(super) colonies: Vec<JsonColonyResult>,
}

/// JSON-serializable colony result.
#[derive(Debug, Serialize)]
pub(super) struct JsonColonyResult {
    /// Colony index (0-based).
    pub(super) id: u8,
    /// Agent label.
    pub(super) agent: String,
    /// Final score.
    pub(super) score: i32,
    /// Live ants at the end.
    pub(super) ants: usize,
    /// Unrazed hills at the end.
    pub(super) hills: usize,
    /// Unspent spawn credit.
    pub(super) hive: u32,
}

impl JsonGameResult {
    /// Create from a `GameResult`.
    pub(super) fn from_game_result(result: &GameResult) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner.map(|c| c.0),
            turns_played: result.turns_played,
            ants_lost: result.ants_lost,
            hills_razed: result.hills_razed,
            food_harvested: result.food_harvested,
            colonies: result
                .colonies
                .iter()
                .map(|stats| JsonColonyResult {
                    id: stats.colony.0,
                    agent: agent_name(result, stats.colony.index()).to_string(),
                    score: stats.score,
                    ants: stats.ants,
                    hills: stats.hills,
                    hive: stats.hive,
                })
                .collect(),
        }
    }
}

fn agent_name(result: &GameResult, index: usize) -> &str {
    result.agents.get(index).map_or("unknown", String::as_str)
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    if let Some(winner) = result.winner {
        let name = agent_name(result, winner.index());
        let _ = writeln!(output, "  Winner: Colony {winner} ({name})");
    } else {
        output.push_str("  Winner: Draw\n");
    }
    let _ = writeln!(output, "  Turns: {}", result.turns_played);
    let _ = writeln!(
        output,
        "  Ants lost: {}, hills razed: {}, food harvested: {}\n",
        result.ants_lost, result.hills_razed, result.food_harvested
    );

    for stats in &result.colonies {
        let name = agent_name(result, stats.colony.index());
        let _ = write!(
            output,
            "  Colony {}: {} points ({name}) - {} ants, {} hills",
            stats.colony, stats.score, stats.ants, stats.hills
        );
        if stats.ants == 0 && stats.hive == 0 {
            output.push_str(" [extinct]");
        }
        output.push('\n');
    }

    output
}
