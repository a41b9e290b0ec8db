//! Rule engine trait for draughts variants.
//!
//! Variants implement `RuleEngine` to define:
//! - Which destinations each piece may move to
//! - How a move changes the board
//! - When the turn passes
//!
//! The session layer calls into `RuleEngine` but never interprets the
//! rules itself.

use serde::{Deserialize, Serialize};

use crate::core::{BoardSize, Color, MoveResult, PieceId, PieceSnapshot, Position, TurnPhase};
use crate::error::{ConfigError, MoveError};
use crate::games::english::EnglishDraughts;

/// Rule engine trait.
///
/// ## Implementation Notes
///
/// - `list_moves`: Return empty for unknown pieces and pieces that may not
///   move this turn
/// - `move_piece`: Must leave the state untouched when it returns an error
/// - No terminal state is modeled; a side without moves simply has an
///   empty `list_moves` for every piece
pub trait RuleEngine: Send {
    /// Board dimensions.
    fn board_size(&self) -> BoardSize;

    /// Color whose turn it is.
    fn current_color(&self) -> Color;

    /// Snapshot of the live pieces.
    ///
    /// The snapshot is detached from the engine: iterating it never affects
    /// engine state, and later moves do not show up in it.
    fn list_pieces(&self) -> PieceSnapshot;

    /// Legal destinations for a piece, in a fixed direction order.
    fn list_moves(&self, piece: PieceId) -> Vec<Position>;

    /// Move a piece to one of its legal destinations.
    ///
    /// # Errors
    ///
    /// - [`MoveError::NoSuchPiece`] if no live piece has this id
    /// - [`MoveError::IllegalMove`] if `target` is not in `list_moves(piece)`
    fn move_piece(&mut self, piece: PieceId, target: Position) -> Result<MoveResult, MoveError>;

    /// Where the turn state machine stands.
    fn phase(&self) -> TurnPhase;
}

/// The rule sets a session can be created with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// English draughts (checkers): short kings, mandatory capture.
    #[default]
    EnglishDraughts,
}

impl Variant {
    /// Colors seated by this variant, in seating order.
    #[must_use]
    pub fn colors(self) -> &'static [Color] {
        match self {
            Variant::EnglishDraughts => &Color::ALL,
        }
    }

    /// Number of peers the variant seats.
    #[must_use]
    pub fn seats(self) -> usize {
        self.colors().len()
    }

    /// Check that a board can be used with this variant.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBoard`] if the starting formation does not fit.
    pub fn validate(self, size: BoardSize) -> Result<(), ConfigError> {
        match self {
            Variant::EnglishDraughts if size.fits_standard_layout() => Ok(()),
            Variant::EnglishDraughts => Err(ConfigError::InvalidBoard(size)),
        }
    }

    /// Build an engine in the variant's starting position.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBoard`] if the starting formation does not fit.
    pub fn create(self, size: BoardSize) -> Result<Box<dyn RuleEngine>, ConfigError> {
        self.validate(size)?;
        match self {
            Variant::EnglishDraughts => Ok(Box::new(EnglishDraughts::new(size))),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::EnglishDraughts => f.write_str("english_draughts"),
        }
    }
}
