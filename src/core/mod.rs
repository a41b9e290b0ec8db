//! Core game types: pieces, board geometry, moves, state.
//!
//! This module contains the variant-independent building blocks. Rule sets
//! read and mutate these through `rules::RuleEngine` implementations.

pub mod action;
pub mod piece;
pub mod position;
pub mod state;

pub use action::{Move, MoveResult, Moves};
pub use piece::{Color, Kind, Piece, PieceId};
pub use position::{BoardSize, Position};
pub use state::{GameState, PieceSnapshot, TurnPhase, STARTING_RANKS};
