//! Anthill CLI - Command-line interface for running and watching games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

/// Anthill - Ants-style colony battles between bots
#[derive(Parser, Debug)]
#[command(name = "anthill")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game to the end and print the result
    Run {
        /// Map file
        map: PathBuf,

        #[command(flatten)]
        game: cli::GameArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Write the final map to this file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Suppress the game banner
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to watch a game in real-time
    Watch {
        /// Map file
        map: PathBuf,

        #[command(flatten)]
        game: cli::GameArgs,

        /// Turn delay in milliseconds (default: 200)
        #[arg(long, default_value = "200")]
        speed: u64,
    },

    /// Check a map file and summarise it
    Validate {
        /// Map file
        map: PathBuf,
    },
}

fn init_logging(verbose: u8, tui: bool) {
    let level = if tui {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, matches!(args.command, Commands::Watch { .. }));

    let result = match args.command {
        Commands::Run {
            map,
            game,
            format,
            save,
            quiet,
        } => cli::run::execute(&map, &game, format, save.as_deref(), quiet),

        Commands::Watch { map, game, speed } => cli::watch::execute(&map, &game, speed),

        Commands::Validate { map } => cli::validate::execute(&map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
