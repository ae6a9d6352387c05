//! Turn state machine and the [`Game`] facade hosts drive.
//!
//! A [`TurnContext`] records the side to move and its [`Phase`]: waiting for a
//! selection, holding a selected piece, or locked onto the piece that must
//! keep capturing. [`Game`] owns the board and the context, and validates every
//! request before handing it to [`crate::rules`].

use serde::Serialize;

use crate::board::Board;
use crate::layout::LayoutError;
use crate::rules;
use crate::types::{Color, Piece, PieceId, Square};

/// Where the side to move is within its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "piece", rename_all = "snake_case")]
pub enum Phase {
    /// No piece picked yet.
    AwaitingSelection,
    /// A piece has been picked; any other own piece may still be picked instead.
    PieceSelected(PieceId),
    /// The piece just captured and can capture again; nothing else may move.
    MustContinueCapture(PieceId),
}

/// Who is to move and what they are constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnContext {
    current_player: Color,
    phase: Phase,
}

impl TurnContext {
    /// Red to move, nothing selected.
    pub fn new() -> Self {
        Self::starting_with(Color::Red)
    }

    pub fn starting_with(current_player: Color) -> Self {
        Self {
            current_player,
            phase: Phase::AwaitingSelection,
        }
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The piece that must keep capturing, if a chain is in progress.
    pub fn forced_piece(&self) -> Option<PieceId> {
        match self.phase {
            Phase::MustContinueCapture(id) => Some(id),
            _ => None,
        }
    }

    /// The piece whose moves are currently being considered.
    pub fn selected(&self) -> Option<PieceId> {
        match self.phase {
            Phase::AwaitingSelection => None,
            Phase::PieceSelected(id) | Phase::MustContinueCapture(id) => Some(id),
        }
    }

    pub(crate) fn select(&mut self, id: PieceId) {
        if self.forced_piece().is_none() {
            self.phase = Phase::PieceSelected(id);
        }
    }

    pub(crate) fn force(&mut self, id: PieceId) {
        self.phase = Phase::MustContinueCapture(id);
    }

    /// End the mover's turn: drop any constraint and hand over to the opponent.
    pub(crate) fn pass(&mut self) {
        self.phase = Phase::AwaitingSelection;
        self.current_player = self.current_player.opponent();
    }
}

impl Default for TurnContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    pub promoted: bool,
    pub must_continue: bool,
    pub next_player: Color,
}

impl MoveOutcome {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// A game in progress: the board plus the turn state it is played under.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: TurnContext,
}

impl Game {
    /// Create a new game from the standard starting position
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            turn: TurnContext::new(),
        }
    }

    /// Start from an arbitrary position with no selection.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            turn: TurnContext::starting_with(side_to_move),
        }
    }

    /// Create a game from a layout string
    pub fn from_layout(layout: &str) -> Result<Self, GameError> {
        let (board, side_to_move) = crate::layout::parse_layout(layout)?;
        Ok(Self::from_board(board, side_to_move))
    }

    /// Export the position as a layout string
    pub fn to_layout(&self) -> String {
        crate::layout::format_layout(&self.board, self.turn.current_player())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> &TurnContext {
        &self.turn
    }

    pub fn current_player(&self) -> Color {
        self.turn.current_player()
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase()
    }

    pub fn selected(&self) -> Option<PieceId> {
        self.turn.selected()
    }

    pub fn forced_piece(&self) -> Option<PieceId> {
        self.turn.forced_piece()
    }

    pub fn piece_at(&self, x: i8, y: i8) -> Option<&Piece> {
        self.board.piece_at(x, y)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.board.pieces()
    }

    /// Try to pick up the piece at `(x, y)`.
    ///
    /// Only pieces of the side to move are accepted, and during a capture
    /// chain only the forced piece. A rejected selection changes nothing.
    pub fn select_piece(&mut self, x: i8, y: i8) -> bool {
        let Some(piece) = self.board.piece_at(x, y) else {
            tracing::trace!(x, y, "selection rejected: no piece");
            return false;
        };
        if piece.color != self.turn.current_player() {
            tracing::trace!(piece = %piece.id, "selection rejected: not this side's turn");
            return false;
        }
        if let Some(forced) = self.turn.forced_piece() {
            if forced != piece.id {
                tracing::trace!(piece = %piece.id, %forced, "selection rejected: capture chain in progress");
                return false;
            }
        }

        self.turn.select(piece.id);
        tracing::debug!(piece = %piece.id, at = %piece.square, "piece selected");
        true
    }

    /// Whether `piece` may move to `(x, y)`. The piece must be the one
    /// currently selected (or forced).
    pub fn is_legal_move(&self, piece: PieceId, x: i8, y: i8) -> bool {
        self.resolve(piece, x, y).is_some()
    }

    /// Squares the given piece could move to right now, for highlighting.
    pub fn legal_destinations(&self, piece: PieceId) -> Vec<Square> {
        if self.turn.selected() != Some(piece) {
            return Vec::new();
        }
        match self.board.square_of(piece) {
            Some(from) => rules::legal_destinations(&self.board, &self.turn, from),
            None => Vec::new(),
        }
    }

    /// Make a move on the board
    pub fn apply_move(&mut self, piece: PieceId, x: i8, y: i8) -> Result<MoveOutcome, GameError> {
        // Validate move is legal
        let Some((from, dest)) = self.resolve(piece, x, y) else {
            tracing::trace!(%piece, x, y, "illegal move rejected");
            return Err(GameError::IllegalMove);
        };

        let outcome = rules::apply_move(&mut self.board, &mut self.turn, from, dest)
            .ok_or(GameError::IllegalMove)?;

        tracing::debug!(
            piece = %outcome.piece,
            from = %outcome.from,
            to = %outcome.to,
            must_continue = outcome.must_continue,
            next = %outcome.next_player,
            "move applied"
        );

        Ok(outcome)
    }

    fn resolve(&self, piece: PieceId, x: i8, y: i8) -> Option<(Square, Square)> {
        if self.turn.selected() != Some(piece) {
            return None;
        }
        let from = self.board.square_of(piece)?;
        let dest = Square::new(x, y)?;
        rules::is_legal_move(&self.board, &self.turn, from, dest).then_some((from, dest))
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Illegal move")]
    IllegalMove,
    #[error("Layout parse error: {0}")]
    LayoutError(#[from] LayoutError),
}
