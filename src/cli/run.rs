//! Run command implementation.

use super::output::{format_text, JsonGameResult};
use super::{read_map, CliError, GameArgs, OutputFormat};
use anthill::run_game;
use std::fs;
use std::path::Path;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the map cannot be read, an agent cannot be
/// started or the final map cannot be saved.
pub(crate) fn execute(
    map: &Path,
    game: &GameArgs,
    format: OutputFormat,
    save: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let text = read_map(map)?;
    let config = game.config();

    if !quiet {
        println!("Running {} with seed {}...", map.display(), config.seed);
        let labels: Vec<String> = game.agents.iter().map(ToString::to_string).collect();
        if !labels.is_empty() {
            println!("Agents: {}", labels.join(", "));
        }
        println!();
    }

    let result = run_game(&text, &game.agents, &config)?;

    if let Some(save_path) = save {
        fs::write(save_path, result.final_map.to_string()).map_err(|e| {
            CliError::new(format!("Failed to save {}: {e}", save_path.display()))
        })?;
        if !quiet {
            println!("Final map saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let json_result = JsonGameResult::from_game_result(&result);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
