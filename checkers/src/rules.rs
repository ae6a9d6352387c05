//! Move legality, capture detection and move application.
//!
//! Everything here is a plain function over a [`Board`] and the
//! [`TurnContext`] it is played under. [`crate::Game`] wraps these for hosts.

use crate::board::Board;
use crate::game::{MoveOutcome, Phase, TurnContext};
use crate::types::Square;

/// The four diagonal unit steps.
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Whether the piece on `from` may move to `dest` right now.
///
/// A one-square step must go forward (kings go either way) and is refused
/// while a capture chain is in progress. A two-square jump needs an opposing
/// piece on the midpoint; its direction is not restricted, so men may jump
/// backward here even though [`can_capture_again`] only looks forward.
pub fn is_legal_move(board: &Board, turn: &TurnContext, from: Square, dest: Square) -> bool {
    let Some(piece) = board.piece_on(from) else {
        return false;
    };
    if board.piece_on(dest).is_some() {
        return false;
    }

    let (dx, dy) = from.delta(dest);
    match (dx.abs(), dy.abs()) {
        (1, 1) => {
            !matches!(turn.phase(), Phase::MustContinueCapture(_)) && piece.moves_toward(dy)
        }
        (2, 2) => from
            .offset(dx / 2, dy / 2)
            .and_then(|mid| board.piece_on(mid))
            .is_some_and(|mid| mid.color != piece.color),
        _ => false,
    }
}

/// Whether the piece on `square` has a capture available from where it stands.
///
/// Men only look forward. Returns on the first qualifying direction.
pub fn can_capture_again(board: &Board, square: Square) -> bool {
    let Some(piece) = board.piece_on(square) else {
        return false;
    };

    DIAGONALS.iter().any(|&(dx, dy)| {
        if !piece.moves_toward(dy) {
            return false;
        }
        let (Some(mid), Some(landing)) = (square.offset(dx, dy), square.offset(2 * dx, 2 * dy))
        else {
            return false;
        };
        board.piece_on(landing).is_none()
            && board
                .piece_on(mid)
                .is_some_and(|victim| victim.color != piece.color)
    })
}

/// Every square the piece on `from` could legally reach this move.
pub fn legal_destinations(board: &Board, turn: &TurnContext, from: Square) -> Vec<Square> {
    DIAGONALS
        .iter()
        .flat_map(|&(dx, dy)| [from.offset(dx, dy), from.offset(2 * dx, 2 * dy)])
        .flatten()
        .filter(|&dest| is_legal_move(board, turn, from, dest))
        .collect()
}

/// Play a move that has already been validated with [`is_legal_move`].
///
/// Removes the jumped piece, relocates the mover, crowns it on its promotion
/// row and advances `turn`. Nothing is re-validated; the only refusal is an
/// empty origin square, reported as `None` with nothing changed.
pub fn apply_move(
    board: &mut Board,
    turn: &mut TurnContext,
    from: Square,
    dest: Square,
) -> Option<MoveOutcome> {
    let mover = *board.piece_on(from)?;
    let (dx, dy) = from.delta(dest);

    let captured = if dx.abs() == 2 {
        from.offset(dx / 2, dy / 2)
            .and_then(|mid| board.remove_piece(mid))
    } else {
        None
    };

    board.move_piece_to(from, dest);

    let promoted = dest.y() == mover.color.promotion_row() && board.promote(dest);

    let must_continue = captured.is_some() && can_capture_again(board, dest);
    if must_continue {
        turn.force(mover.id);
    } else {
        turn.pass();
    }

    if let Some(victim) = &captured {
        tracing::debug!(mover = %mover.id, victim = %victim.id, at = %victim.square, "capture");
    }
    if promoted {
        tracing::debug!(piece = %mover.id, at = %dest, "promoted to king");
    }

    Some(MoveOutcome {
        piece: mover.id,
        from,
        to: dest,
        captured,
        promoted,
        must_continue,
        next_player: turn.current_player(),
    })
}
