//! checkerstty - play checkers from a terminal or a script.
//!
//! A thin host around the `checkers` rules engine. Each input line is one
//! request (select a piece, test a destination, apply a move, redraw) and is
//! resolved completely before the next line is read. All rules live in the
//! engine; this binary only parses input and prints replies.
//!
//! Logging goes to stderr and is controlled by `CHECKERSTTY_LOG` (see
//! [`config`] for all tunables).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use checkers::{Game, GameError, STANDARD_LAYOUT};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod session;

use session::Session;

/// Top-level CLI arguments for checkerstty.
///
/// When invoked with no subcommand, starts an interactive session on stdin
/// (or replays `--script`).
#[derive(Parser)]
#[command(name = "checkerstty", about = "Checkers rules engine driven from the terminal")]
struct Cli {
    /// Start from this layout instead of the standard position.
    /// Overrides `CHECKERSTTY_LAYOUT`.
    #[arg(long)]
    layout: Option<String>,

    /// Read commands from a file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print move outcomes and piece lists as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the standard starting layout and exit.
    Layout,
}

/// Error type for CLI operations.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The starting layout could not be parsed.
    #[error("invalid starting layout: {0}")]
    Layout(#[from] GameError),

    /// The script file could not be opened.
    #[error("failed to open script {0}: {1}")]
    Script(PathBuf, #[source] std::io::Error),

    /// Reading input or writing a reply failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A reply could not be encoded as JSON.
    #[error("failed to encode reply: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the starting game: `--layout`, then `CHECKERSTTY_LAYOUT`, then the
/// standard position.
fn starting_game(layout: Option<String>) -> Result<Game, CliError> {
    match layout.or_else(config::get_start_layout) {
        Some(layout) => {
            tracing::info!(%layout, "starting from custom layout");
            Ok(Game::from_layout(&layout)?)
        }
        None => Ok(Game::new()),
    }
}

/// Open the command source: the script file when given, stdin otherwise.
fn command_source(script: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match script {
        Some(path) => {
            let file = File::open(path).map_err(|e| CliError::Script(path.to_path_buf(), e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}

fn main() -> Result<(), CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::get_log_filter()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Layout) = cli.command {
        println!("{STANDARD_LAYOUT}");
        return Ok(());
    }

    let game = starting_game(cli.layout)?;
    let input = command_source(cli.script.as_deref())?;

    tracing::info!(to_move = %game.current_player(), "session started");
    let mut session = Session::new(game, std::io::stdout().lock(), cli.json);
    session.run(input)?;
    tracing::info!(layout = %session.game().to_layout(), "session ended");

    Ok(())
}
