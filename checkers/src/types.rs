//! Canonical color, square and piece types for the project.

use serde::{Deserialize, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 8;

/// The two sides. Red moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Vertical step a man of this color takes: red toward y=0, black toward y=7.
    pub fn forward(self) -> i8 {
        match self {
            Self::Red => -1,
            Self::Black => 1,
        }
    }

    /// Row on which a man of this color is crowned.
    pub fn promotion_row(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Black => BOARD_SIZE - 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Red => 'r',
            Self::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Self::Red),
            'b' => Some(Self::Black),
            _ => None,
        }
    }
}

/// A square on the 8x8 board. Always in range once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSquare")]
pub struct Square {
    x: u8,
    y: u8,
}

/// Unchecked wire form of a [`Square`]; deserialization goes through
/// [`Square::new`].
#[derive(Deserialize)]
struct RawSquare {
    x: i8,
    y: i8,
}

impl TryFrom<RawSquare> for Square {
    type Error = SquareError;

    fn try_from(raw: RawSquare) -> Result<Self, Self::Error> {
        Square::new(raw.x, raw.y).ok_or(SquareError::OffBoard { x: raw.x, y: raw.y })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SquareError {
    #[error("Square ({x}, {y}) is off the board")]
    OffBoard { x: i8, y: i8 },
}

impl Square {
    /// Build a square from raw coordinates; `None` when off-board.
    pub fn new(x: i8, y: i8) -> Option<Self> {
        let size = BOARD_SIZE as i8;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }

    /// Only dark squares ever hold a piece.
    pub fn is_dark(self) -> bool {
        (self.x + self.y) % 2 == 1
    }

    /// The square `(dx, dy)` away, if it is still on the board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Self::new(self.x as i8 + dx, self.y as i8 + dy)
    }

    /// Signed `(dx, dy)` from `self` to `other`.
    pub fn delta(self, other: Square) -> (i8, i8) {
        (
            other.x as i8 - self.x as i8,
            other.y as i8 - self.y as i8,
        )
    }

    /// Iterate all 64 squares row by row, starting at (0, 0).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Square { x, y }))
    }
}

/// Identity of a piece, stable for as long as the piece is alive.
///
/// Hosts use it to map a piece onto whatever visual handle they own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

/// A live piece. Captured pieces are dropped from the board and cease to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub king: bool,
    pub square: Square,
}

impl Piece {
    /// Layout character: lowercase for men, uppercase for kings.
    pub fn to_char(&self) -> char {
        let c = self.color.to_char();
        if self.king {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Whether this piece may step or capture toward `dy`.
    pub fn moves_toward(&self, dy: i8) -> bool {
        self.king || dy.signum() == self.color.forward()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
