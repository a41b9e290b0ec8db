//! Pieces and their identity.
//!
//! ## PieceId
//!
//! Every piece on the board has a unique `PieceId`. Ids are allocated from 1
//! upward when the board is set up and are never reused within a game, so a
//! captured piece's id stays dead.
//!
//! ## Color
//!
//! The two sides. `Color::ALL` fixes their order, which is also the order in
//! which connecting peers are seated.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Unique identifier for a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl PieceId {
    /// The first id handed out by a fresh board.
    pub const FIRST: Self = Self(1);

    /// Create a new piece ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for PieceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece({})", self.0)
    }
}

/// A side in the game. White starts on rank 0 and moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// All colors in seating order.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction in which this color's pawns advance.
    #[must_use]
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Wire name of this color.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    /// Parse a wire name.
    ///
    /// ```
    /// use rust_draughts::core::Color;
    ///
    /// assert_eq!(Color::parse("black"), Some(Color::Black));
    /// assert_eq!(Color::parse("red"), None);
    /// ```
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "white" => Some(Color::White),
            "black" => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Piece rank: pawns move forward only, kings in all four diagonals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Pawn,
    King,
}

impl Kind {
    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Pawn => "pawn",
            Kind::King => "king",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "pawn" => Some(Kind::Pawn),
            "king" => Some(Kind::King),
            _ => None,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live piece on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub position: Position,
    pub color: Color,
    pub kind: Kind,
}

impl Piece {
    /// Create a new pawn.
    #[must_use]
    pub const fn pawn(id: PieceId, position: Position, color: Color) -> Self {
        Self {
            id,
            position,
            color,
            kind: Kind::Pawn,
        }
    }

    /// Check if this piece is a king.
    #[must_use]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, Kind::King)
    }

    /// Diagonal directions this piece may travel in, forward first.
    ///
    /// Order: `(+1, fwd)`, `(-1, fwd)`, then for kings `(+1, -fwd)`,
    /// `(-1, -fwd)`.
    #[must_use]
    pub fn directions(&self) -> &'static [(i32, i32)] {
        const WHITE: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
        const BLACK: [(i32, i32); 4] = [(1, -1), (-1, -1), (1, 1), (-1, 1)];

        let all: &'static [(i32, i32); 4] = match self.color {
            Color::White => &WHITE,
            Color::Black => &BLACK,
        };
        match self.kind {
            Kind::Pawn => &all[..2],
            Kind::King => &all[..],
        }
    }
}
