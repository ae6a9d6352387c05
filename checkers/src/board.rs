//! Authoritative piece placement on the 8x8 board.
//!
//! The board answers point queries and performs raw mutations. It never
//! checks legality and never looks at whose turn it is; that is the job of
//! [`crate::rules`].

use crate::types::{Color, Piece, PieceId, Square, BOARD_SIZE};

/// Rows occupied by each side in the standard start position.
const BLACK_START_ROWS: std::ops::Range<u8> = 0..3;
const RED_START_ROWS: std::ops::Range<u8> = 5..8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    next_id: u32,
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            next_id: 0,
        }
    }

    /// Twelve men per side on the dark squares of the three back rows.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for square in Square::all().filter(|s| s.is_dark()) {
            let color = if BLACK_START_ROWS.contains(&square.y()) {
                Color::Black
            } else if RED_START_ROWS.contains(&square.y()) {
                Color::Red
            } else {
                continue;
            };
            let id = PieceId(board.next_id);
            board.next_id += 1;
            board.set(id, color, false, square);
        }
        board
    }

    /// Place a new piece. Only used while setting up a position.
    pub fn place(&mut self, color: Color, king: bool, square: Square) -> Result<PieceId, BoardError> {
        if !square.is_dark() {
            return Err(BoardError::LightSquare(square));
        }
        if self.piece_on(square).is_some() {
            return Err(BoardError::Occupied(square));
        }
        let id = PieceId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(BoardError::IdsExhausted)?;
        self.set(id, color, king, square);
        Ok(id)
    }

    fn set(&mut self, id: PieceId, color: Color, king: bool, square: Square) {
        *self.slot_mut(square) = Some(Piece {
            id,
            color,
            king,
            square,
        });
    }

    /// Piece at raw coordinates; `None` for empty or off-board squares.
    pub fn piece_at(&self, x: i8, y: i8) -> Option<&Piece> {
        Square::new(x, y).and_then(|square| self.piece_on(square))
    }

    pub fn piece_on(&self, square: Square) -> Option<&Piece> {
        self.squares[square.y() as usize][square.x() as usize].as_ref()
    }

    fn slot_mut(&mut self, square: Square) -> &mut Option<Piece> {
        &mut self.squares[square.y() as usize][square.x() as usize]
    }

    /// Relocate whatever stands on `from` to `to`. No legality checks; the
    /// caller has already validated the move. Returns false if `from` was empty.
    pub fn move_piece_to(&mut self, from: Square, to: Square) -> bool {
        match self.slot_mut(from).take() {
            Some(mut piece) => {
                piece.square = to;
                *self.slot_mut(to) = Some(piece);
                true
            }
            None => false,
        }
    }

    /// Take a piece off the board for good.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.slot_mut(square).take()
    }

    /// Crown the piece on `square`. Returns true only if it was not a king yet.
    pub fn promote(&mut self, square: Square) -> bool {
        match self.slot_mut(square) {
            Some(piece) if !piece.king => {
                piece.king = true;
                true
            }
            _ => false,
        }
    }

    /// All live pieces, row by row from (0, 0).
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten().flatten()
    }

    pub fn square_of(&self, id: PieceId) -> Option<Square> {
        self.pieces().find(|p| p.id == id).map(|p| p.square)
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|p| p.color == color).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Square {0} is light and cannot hold a piece")]
    LightSquare(Square),
    #[error("Square {0} is already occupied")]
    Occupied(Square),
    #[error("No piece ids left on this board")]
    IdsExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(x: i8, y: i8) -> Square {
        Square::new(x, y).unwrap()
    }

    #[test]
    fn test_standard_position() {
        let board = Board::standard();
        assert_eq!(board.count(Color::Red), 12);
        assert_eq!(board.count(Color::Black), 12);
        assert_eq!(board.piece_at(1, 0).map(|p| p.color), Some(Color::Black));
        assert_eq!(board.piece_at(0, 5).map(|p| p.color), Some(Color::Red));
        assert!(board.piece_at(0, 0).is_none());
        assert!(board.piece_at(1, 4).is_none());
        assert!(board.pieces().all(|p| p.square.is_dark() && !p.king));
    }

    #[test]
    fn test_ids_are_unique() {
        let board = Board::standard();
        let mut ids: Vec<_> = board.pieces().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 24);
    }

    #[test]
    fn test_off_board_lookup() {
        let board = Board::standard();
        assert!(board.piece_at(-1, 0).is_none());
        assert!(board.piece_at(8, 1).is_none());
    }

    #[test]
    fn test_place_rejects_light_and_occupied() {
        let mut board = Board::empty();
        assert_eq!(
            board.place(Color::Red, false, sq(0, 0)),
            Err(BoardError::LightSquare(sq(0, 0)))
        );
        board.place(Color::Red, false, sq(1, 0)).unwrap();
        assert_eq!(
            board.place(Color::Black, false, sq(1, 0)),
            Err(BoardError::Occupied(sq(1, 0)))
        );
    }

    #[test]
    fn test_move_piece_updates_square() {
        let mut board = Board::empty();
        let id = board.place(Color::Black, false, sq(1, 0)).unwrap();
        assert!(board.move_piece_to(sq(1, 0), sq(2, 1)));
        assert!(board.piece_on(sq(1, 0)).is_none());
        let piece = board.piece_on(sq(2, 1)).unwrap();
        assert_eq!(piece.id, id);
        assert_eq!(piece.square, sq(2, 1));
        assert_eq!(board.square_of(id), Some(sq(2, 1)));
        assert!(!board.move_piece_to(sq(1, 0), sq(0, 1)));
    }

    #[test]
    fn test_remove_piece() {
        let mut board = Board::empty();
        let id = board.place(Color::Red, false, sq(2, 1)).unwrap();
        let removed = board.remove_piece(sq(2, 1)).unwrap();
        assert_eq!(removed.id, id);
        assert!(board.piece_on(sq(2, 1)).is_none());
        assert_eq!(board.square_of(id), None);
        assert_eq!(board.count(Color::Red), 0);
    }

    #[test]
    fn test_ids_stay_unique_across_many_placements() {
        let mut board = Board::empty();
        let mut last = None;
        for _ in 0..300 {
            let id = board.place(Color::Red, false, sq(1, 0)).unwrap();
            assert!(last.map_or(true, |prev| id > prev));
            assert_eq!(board.remove_piece(sq(1, 0)).map(|p| p.id), Some(id));
            last = Some(id);
        }
        assert_eq!(last, Some(PieceId(299)));
    }

    #[test]
    fn test_place_reports_exhausted_ids() {
        let mut board = Board::empty();
        board.next_id = u32::MAX;
        assert_eq!(
            board.place(Color::Black, false, sq(1, 0)),
            Err(BoardError::IdsExhausted)
        );
        assert!(board.piece_on(sq(1, 0)).is_none());
    }

    #[test]
    fn test_promote_is_idempotent() {
        let mut board = Board::empty();
        board.place(Color::Red, false, sq(1, 0)).unwrap();
        assert!(board.promote(sq(1, 0)));
        assert!(!board.promote(sq(1, 0)));
        assert!(board.piece_on(sq(1, 0)).unwrap().king);
        assert!(!board.promote(sq(3, 0)));
    }
}
