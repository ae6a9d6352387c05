//! Text notation for board positions, modelled on FEN.
//!
//! Eight rows separated by `/`, from y=0 to y=7, each read from x=0 to x=7.
//! `r`/`b` are men, `R`/`B` kings, and a digit skips that many empty squares.
//! An optional second field names the side to move (`r` or `b`, default red).
//!
//! ```text
//! 1b1b1b1b/b1b1b1b1/1b1b1b1b/8/8/r1r1r1r1/1r1r1r1r/r1r1r1r1 r
//! ```

use crate::board::{Board, BoardError};
use crate::types::{Color, Square, BOARD_SIZE};

/// Layout of [`Board::standard`] with red to move.
pub const STANDARD_LAYOUT: &str = "1b1b1b1b/b1b1b1b1/1b1b1b1b/8/8/r1r1r1r1/1r1r1r1r/r1r1r1r1 r";

/// Parse a layout string into a board and the side to move.
pub fn parse_layout(layout: &str) -> Result<(Board, Color), LayoutError> {
    let mut fields = layout.split_whitespace();
    let placement = fields.next().ok_or(LayoutError::InvalidFormat)?;
    let side = match fields.next() {
        None => Color::Red,
        Some(field) => parse_side(field)?,
    };
    if fields.next().is_some() {
        return Err(LayoutError::InvalidFormat);
    }

    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != BOARD_SIZE as usize {
        return Err(LayoutError::InvalidFormat);
    }

    let mut board = Board::empty();
    for (y, row) in rows.iter().enumerate() {
        let mut x = 0u32;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 {
                    return Err(LayoutError::InvalidFormat);
                }
                x += skip;
                continue;
            }
            let color = Color::from_char(c).ok_or(LayoutError::InvalidPiece(c))?;
            let square = Square::new(x as i8, y as i8).ok_or(LayoutError::InvalidFormat)?;
            board
                .place(color, c.is_ascii_uppercase(), square)
                .map_err(|e| match e {
                    BoardError::LightSquare(sq) => LayoutError::LightSquare {
                        x: sq.x(),
                        y: sq.y(),
                    },
                    BoardError::Occupied(_) | BoardError::IdsExhausted => {
                        LayoutError::InvalidFormat
                    }
                })?;
            x += 1;
        }
        if x != BOARD_SIZE as u32 {
            return Err(LayoutError::InvalidFormat);
        }
    }

    Ok((board, side))
}

fn parse_side(field: &str) -> Result<Color, LayoutError> {
    let mut chars = field.chars();
    match (chars.next().and_then(Color::from_char), chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(LayoutError::InvalidSideToMove(field.to_string())),
    }
}

/// Format a board and the side to move as a layout string.
pub fn format_layout(board: &Board, side_to_move: Color) -> String {
    let rows: Vec<String> = (0..BOARD_SIZE)
        .map(|y| {
            let mut row = String::new();
            let mut empty = 0;
            for x in 0..BOARD_SIZE {
                match board.piece_at(x as i8, y as i8) {
                    Some(piece) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            row
        })
        .collect();

    format!("{} {}", rows.join("/"), side_to_move.to_char())
}

impl std::fmt::Display for Board {
    /// Grid with x across the top and y down the side; `.` marks a dark
    /// empty square.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  ")?;
        for x in 0..BOARD_SIZE {
            write!(f, " {x}")?;
        }
        writeln!(f)?;
        for square in Square::all() {
            if square.x() == 0 {
                write!(f, "{} ", square.y())?;
            }
            let c = match self.piece_on(square) {
                Some(piece) => piece.to_char(),
                None if square.is_dark() => '.',
                None => ' ',
            };
            write!(f, " {c}")?;
            if square.x() == BOARD_SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Invalid layout string")]
    InvalidFormat,
    #[error("Invalid piece character: {0}")]
    InvalidPiece(char),
    #[error("Piece on light square ({x}, {y})")]
    LightSquare { x: u8, y: u8 },
    #[error("Invalid side to move: {0}")]
    InvalidSideToMove(String),
}
