//! Board geometry: squares and board dimensions.
//!
//! Coordinates are signed so that a neighbour of an edge square can be
//! computed and then rejected by `BoardSize::contains`, rather than
//! underflowing.
//!
//! ## Usage
//!
//! ```
//! use rust_draughts::core::{BoardSize, Position};
//!
//! let board = BoardSize::new(8, 8);
//! let corner = Position::new(0, 0);
//!
//! assert!(board.contains(corner));
//! assert!(!board.contains(corner.offset(-1, 1)));
//! ```

use serde::{Deserialize, Serialize};

use super::piece::Color;

/// A square on the board, `x` along a rank and `y` across ranks.
///
/// Rank `y = 0` is white's home side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The square `dx` files and `dy` ranks away.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board dimensions in squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u32,
    pub height: u32,
}

impl BoardSize {
    /// The standard 8x8 board.
    pub const STANDARD: Self = Self::new(8, 8);

    /// Largest width or height a standard formation is set up on.
    pub const MAX_SIDE: u32 = 1024;

    /// Create a new board size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if a position lies on the board.
    #[must_use]
    pub const fn contains(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as i64) < self.width as i64
            && (position.y as i64) < self.height as i64
    }

    /// The rank on which pawns of `color` are promoted.
    ///
    /// This is the rank farthest from that color's home side. Heights past
    /// `i32::MAX` saturate, since no position can lie beyond that rank.
    #[must_use]
    pub fn promotion_rank(self, color: Color) -> i32 {
        match color {
            Color::White => i32::try_from(self.height).map_or(i32::MAX, |height| height - 1),
            Color::Black => 0,
        }
    }

    /// Check if the board can hold the standard three-rank formation.
    ///
    /// The width must be even so every rank holds `width / 2` pieces, and
    /// the height must leave the two formations disjoint. Neither side may
    /// exceed [`MAX_SIDE`](Self::MAX_SIDE).
    #[must_use]
    pub const fn fits_standard_layout(self) -> bool {
        self.width >= 2
            && self.width % 2 == 0
            && self.width <= Self::MAX_SIDE
            && self.height >= 6
            && self.height <= Self::MAX_SIDE
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl std::fmt::Display for BoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let p = Position::new(3, 4);
        assert_eq!(p.offset(1, 1), Position::new(4, 5));
        assert_eq!(p.offset(-1, -1), Position::new(2, 3));
        assert_eq!(p.offset(-4, 0), Position::new(-1, 4));
    }

    #[test]
    fn test_contains() {
        let board = BoardSize::new(8, 8);

        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(7, 7)));
        assert!(!board.contains(Position::new(8, 0)));
        assert!(!board.contains(Position::new(0, 8)));
        assert!(!board.contains(Position::new(-1, 3)));
        assert!(!board.contains(Position::new(3, -1)));
    }

    #[test]
    fn test_promotion_rank() {
        let board = BoardSize::new(10, 10);
        assert_eq!(board.promotion_rank(Color::White), 9);
        assert_eq!(board.promotion_rank(Color::Black), 0);
    }

    #[test]
    fn test_fits_standard_layout() {
        assert!(BoardSize::new(8, 8).fits_standard_layout());
        assert!(BoardSize::new(2, 6).fits_standard_layout());
        assert!(!BoardSize::new(7, 8).fits_standard_layout());
        assert!(!BoardSize::new(8, 5).fits_standard_layout());
        assert!(!BoardSize::new(0, 8).fits_standard_layout());

        assert!(BoardSize::new(BoardSize::MAX_SIDE, BoardSize::MAX_SIDE).fits_standard_layout());
        assert!(!BoardSize::new(2, BoardSize::MAX_SIDE + 2).fits_standard_layout());
        assert!(!BoardSize::new(2_000_000_000, 8).fits_standard_layout());
        assert!(!BoardSize::new(2, 3_000_000_000).fits_standard_layout());
    }

    #[test]
    fn test_promotion_rank_saturates() {
        assert_eq!(BoardSize::STANDARD.promotion_rank(Color::White), 7);
        assert_eq!(BoardSize::STANDARD.promotion_rank(Color::Black), 0);
        assert_eq!(BoardSize::new(2, u32::MAX).promotion_rank(Color::White), i32::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Position::new(2, 5)), "(2, 5)");
        assert_eq!(format!("{}", BoardSize::STANDARD), "8x8");
    }

    #[test]
    fn test_serialization() {
        let p = Position::new(1, 2);
        let json = serde_json::to_string(&p).unwrap();
        let deserialized: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deserialized);
    }
}
