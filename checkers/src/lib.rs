//! Rules engine for 8x8 checkers: diagonal moves, capture chains the mover
//! must finish, and promotion to king on the far row.
//!
//! Hosts drive a [`Game`]: select a piece, ask whether a destination is legal,
//! then apply the move and re-render from the returned [`MoveOutcome`].

pub mod board;
pub mod game;
pub mod layout;
pub mod rules;
pub mod types;

pub use board::{Board, BoardError};
pub use game::{Game, GameError, MoveOutcome, Phase, TurnContext};
pub use layout::{format_layout, parse_layout, LayoutError, STANDARD_LAYOUT};
pub use types::{Color, Piece, PieceId, Square, SquareError, BOARD_SIZE};
