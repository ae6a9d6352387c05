//! Line-oriented play session.
//!
//! Reads one command per line, resolves it against the [`Game`] and writes a
//! reply before reading the next line. Malformed commands are reported inline
//! and never end the session.

use std::io::{BufRead, Write};
use std::str::FromStr;

use checkers::{Game, MoveOutcome, Piece};

use crate::CliError;

const HELP: &str = "\
commands:
  select X Y   pick up the piece at (X, Y)
  legal X Y    can the selected piece move to (X, Y)
  move X Y     move the selected piece to (X, Y)
  moves        list destinations of the selected piece
  board        draw the board
  pieces       list live pieces
  layout       print the position as a layout string
  turn         show whose turn it is
  help         show this text
  quit         leave the session";

/// A single parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(i8, i8),
    Legal(i8, i8),
    Move(i8, i8),
    Moves,
    Board,
    Pieces,
    Layout,
    Turn,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{0}` expects two coordinates")]
    MissingCoordinates(&'static str),
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("unexpected argument: {0}")]
    TrailingArgument(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();

        let command = match name {
            "select" => {
                let (x, y) = coordinates(&mut words, "select")?;
                Self::Select(x, y)
            }
            "legal" => {
                let (x, y) = coordinates(&mut words, "legal")?;
                Self::Legal(x, y)
            }
            "move" => {
                let (x, y) = coordinates(&mut words, "move")?;
                Self::Move(x, y)
            }
            "moves" => Self::Moves,
            "board" => Self::Board,
            "pieces" => Self::Pieces,
            "layout" => Self::Layout,
            "turn" => Self::Turn,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::TrailingArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn coordinates<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<(i8, i8), CommandError> {
    let mut next = || {
        let word = words.next().ok_or(CommandError::MissingCoordinates(command))?;
        word.parse::<i8>()
            .map_err(|_| CommandError::InvalidCoordinate(word.to_string()))
    };
    Ok((next()?, next()?))
}

/// A game plus the sink replies are written to.
pub struct Session<W: Write> {
    game: Game,
    out: W,
    json: bool,
}

impl<W: Write> Session<W> {
    pub fn new(game: Game, out: W, json: bool) -> Self {
        Self { game, out, json }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Process lines until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> Result<(), CliError> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    tracing::debug!(?command, "executing");
                    self.execute(command)?;
                }
                Err(e) => {
                    tracing::warn!(line, error = %e, "rejected input line");
                    writeln!(self.out, "error: {e}")?;
                }
            }
            self.out.flush()?;
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<(), CliError> {
        match command {
            Command::Select(x, y) => {
                if self.game.select_piece(x, y) {
                    if let Some(piece) = self.game.piece_at(x, y) {
                        writeln!(self.out, "selected {} at {}", piece.id, piece.square)?;
                    }
                } else {
                    writeln!(self.out, "cannot select ({x}, {y})")?;
                }
            }
            Command::Legal(x, y) => match self.game.selected() {
                Some(id) => {
                    let verdict = if self.game.is_legal_move(id, x, y) { "yes" } else { "no" };
                    writeln!(self.out, "{verdict}")?;
                }
                None => writeln!(self.out, "no piece selected")?,
            },
            Command::Move(x, y) => match self.game.selected() {
                Some(id) => match self.game.apply_move(id, x, y) {
                    Ok(outcome) => self.report_move(&outcome)?,
                    Err(e) => writeln!(self.out, "{e}")?,
                },
                None => writeln!(self.out, "no piece selected")?,
            },
            Command::Moves => {
                let dests = self
                    .game
                    .selected()
                    .map(|id| self.game.legal_destinations(id))
                    .unwrap_or_default();
                if self.json {
                    writeln!(self.out, "{}", serde_json::to_string(&dests)?)?;
                } else {
                    let listed: Vec<String> = dests.iter().map(ToString::to_string).collect();
                    writeln!(self.out, "{}", listed.join(" "))?;
                }
            }
            Command::Board => write!(self.out, "{}", self.game.board())?,
            Command::Pieces => {
                let pieces: Vec<&Piece> = self.game.pieces().collect();
                if self.json {
                    writeln!(self.out, "{}", serde_json::to_string(&pieces)?)?;
                } else {
                    for piece in pieces {
                        let kind = if piece.king { "king" } else { "man" };
                        writeln!(self.out, "{} {} {} {}", piece.id, piece.color, kind, piece.square)?;
                    }
                }
            }
            Command::Layout => writeln!(self.out, "{}", self.game.to_layout())?,
            Command::Turn => match self.game.forced_piece() {
                Some(id) => writeln!(
                    self.out,
                    "{} to move (must continue with {id})",
                    self.game.current_player()
                )?,
                None => writeln!(self.out, "{} to move", self.game.current_player())?,
            },
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn report_move(&mut self, outcome: &MoveOutcome) -> Result<(), CliError> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string(outcome)?)?;
            return Ok(());
        }

        let mut line = format!("moved {} {} -> {}", outcome.piece, outcome.from, outcome.to);
        if let Some(victim) = &outcome.captured {
            line.push_str(&format!(", captured {} at {}", victim.id, victim.square));
        }
        if outcome.promoted {
            line.push_str(", promoted");
        }
        if outcome.must_continue {
            line.push_str(", must continue");
        }
        line.push_str(&format!(", {} to move", outcome.next_player));
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(layout: Option<&str>, json: bool, script: &str) -> String {
        let game = match layout {
            Some(layout) => Game::from_layout(layout).unwrap(),
            None => Game::new(),
        };
        let mut out = Vec::new();
        Session::new(game, &mut out, json)
            .run(script.as_bytes())
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("select 1 2".parse(), Ok(Command::Select(1, 2)));
        assert_eq!("  move  -1 9 ".parse(), Ok(Command::Move(-1, 9)));
        assert_eq!("board".parse(), Ok(Command::Board));
        assert_eq!("exit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "jump 1 2".parse::<Command>(),
            Err(CommandError::Unknown("jump".to_string()))
        );
        assert_eq!(
            "select 1".parse::<Command>(),
            Err(CommandError::MissingCoordinates("select"))
        );
        assert_eq!(
            "legal a 2".parse::<Command>(),
            Err(CommandError::InvalidCoordinate("a".to_string()))
        );
        assert_eq!(
            "board now".parse::<Command>(),
            Err(CommandError::TrailingArgument("now".to_string()))
        );
    }

    #[test]
    fn test_simple_move_session() {
        let out = play(None, false, "select 0 5\nlegal 1 4\nlegal 0 4\nmove 1 4\nturn\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "selected #12 at (0, 5)");
        assert_eq!(lines[1], "yes");
        assert_eq!(lines[2], "no");
        assert_eq!(lines[3], "moved #12 (0, 5) -> (1, 4), black to move");
        assert_eq!(lines[4], "black to move");
    }

    #[test]
    fn test_rejections_keep_session_alive() {
        let out = play(None, false, "select 1 0\nmove 1 4\nfoo\n# comment\n\nselect 0 5\nmove 0 4\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "cannot select (1, 0)");
        assert_eq!(lines[1], "no piece selected");
        assert!(lines[2].starts_with("error: unknown command: foo"));
        assert_eq!(lines[4], "Illegal move");
    }

    #[test]
    fn test_capture_chain_session() {
        let out = play(
            Some("8/8/1b6/8/3b4/4r1r1/8/8 r"),
            false,
            "select 4 5\nmove 2 3\nturn\nselect 6 5\nmoves\nmove 0 1\nturn\n",
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[1],
            "moved #2 (4, 5) -> (2, 3), captured #1 at (3, 4), must continue, red to move"
        );
        assert_eq!(lines[2], "red to move (must continue with #2)");
        assert_eq!(lines[3], "cannot select (6, 5)");
        assert_eq!(lines[4], "(0, 1)");
        assert!(lines[5].contains("captured #0 at (1, 2)"));
        assert_eq!(lines[6], "black to move");
    }

    #[test]
    fn test_quit_stops_reading() {
        let out = play(None, false, "turn\nquit\nturn\n");
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_json_outcome() {
        let out = play(
            Some("1b6/2r5/8/8/8/8/8/8 b"),
            true,
            "select 1 0\nmove 3 2\n",
        );
        let reply = out.lines().nth(1).unwrap();
        let value: serde_json::Value = serde_json::from_str(reply).unwrap();
        assert_eq!(value["captured"]["color"], "red");
        assert_eq!(value["must_continue"], false);
        assert_eq!(value["next_player"], "red");
        assert_eq!(value["to"]["x"], 3);
    }

    #[test]
    fn test_layout_and_pieces() {
        let out = play(Some("8/8/8/4R3/8/8/8/8 b"), false, "layout\npieces\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "8/8/8/4R3/8/8/8/8 b");
        assert_eq!(lines[1], "#0 red king (4, 3)");
    }
}
