//! English draughts (checkers).
//!
//! - Pawns move one square diagonally forward; kings in all four diagonals
//! - Captures jump an adjacent opponent onto the empty square beyond
//! - Capturing is mandatory, and a capturing piece keeps jumping while it can
//! - A pawn reaching the far rank is crowned king
//!
//! Works on any board with an even width and room for three ranks per side.

mod game;

pub use game::{EnglishDraughts, EnglishDraughtsBuilder};
