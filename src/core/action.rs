//! Move representation: legal candidates and executed results.
//!
//! A `Move` is what move generation offers for a piece: a destination and,
//! for a jump, the piece it would capture. A `MoveResult` is what executing
//! one reports back: where the mover ended up, what it took, whether it was
//! crowned, and whether the turn passed to the opponent.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::piece::PieceId;
use super::position::Position;

/// A legal destination for one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Square the piece lands on.
    pub target: Position,

    /// Piece jumped over, for captures.
    pub captured: Option<PieceId>,
}

impl Move {
    /// A one-square diagonal step.
    #[must_use]
    pub const fn step(target: Position) -> Self {
        Self {
            target,
            captured: None,
        }
    }

    /// A jump over `captured` onto `target`.
    #[must_use]
    pub const fn capture(target: Position, captured: PieceId) -> Self {
        Self {
            target,
            captured: Some(captured),
        }
    }

    /// Check if this move takes a piece.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Moves for a single piece.
/// A piece has at most four diagonals, so this never spills to the heap.
pub type Moves = SmallVec<[Move; 4]>;

/// Outcome of an executed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveResult {
    /// Where the moved piece now stands.
    pub position: Position,

    /// The piece removed from the board, if the move was a capture.
    pub captured: Option<PieceId>,

    /// The mover was crowned by this move.
    pub promoted: bool,

    /// The turn passed to the opponent. False while a capture chain continues.
    pub end_turn: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_and_capture() {
        let step = Move::step(Position::new(2, 3));
        let jump = Move::capture(Position::new(3, 4), PieceId(17));

        assert!(!step.is_capture());
        assert!(jump.is_capture());
        assert_eq!(jump.captured, Some(PieceId(17)));
    }

    #[test]
    fn test_moves_stay_inline() {
        let mut moves = Moves::new();
        for x in 0..4 {
            moves.push(Move::step(Position::new(x, 1)));
        }
        assert!(!moves.spilled());
    }

    #[test]
    fn test_move_result_serialization() {
        let result = MoveResult {
            position: Position::new(3, 4),
            captured: Some(PieceId(14)),
            promoted: false,
            end_turn: true,
        };
        let json = serde_json::to_string(&result).unwrap();
        let deserialized: MoveResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, deserialized);
    }
}
