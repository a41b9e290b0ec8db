//! Game state: the pieces on the board and whose move it is.
//!
//! ## GameState
//!
//! Holds the live pieces indexed both by id and by square, the color to
//! move, and the chain piece (the piece that must keep capturing before the
//! turn can end). Mutation is crate-private: outside the rule engine the
//! state can be read and set up, but never moved.
//!
//! ## PieceSnapshot
//!
//! A read-only view of the pieces at one instant. Pieces are stored in
//! `im` persistent maps, so taking a snapshot is an O(1) clone that stays
//! valid however the game moves on afterwards.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::piece::{Color, Kind, Piece, PieceId};
use super::position::{BoardSize, Position};

/// Number of ranks each side fills in the starting formation.
pub const STARTING_RANKS: i32 = 3;

/// Where the turn state machine currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Any eligible piece of this color may move.
    ToMove(Color),
    /// This piece captured and must capture again.
    ChainCapture(PieceId),
}

/// Read-only snapshot of the live pieces, ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pieces: OrdMap<PieceId, Piece>,
}

impl PieceSnapshot {
    /// Number of pieces in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Check if the snapshot holds no pieces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Look up a piece by id.
    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Iterate over pieces in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Iterate over the pieces of one color.
    pub fn of_color(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.iter().filter(move |p| p.color == color)
    }
}

/// Full game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    size: BoardSize,

    /// Live pieces by id.
    pieces: OrdMap<PieceId, Piece>,

    /// Occupied squares. Kept in lockstep with `pieces`.
    squares: OrdMap<Position, PieceId>,

    to_move: Color,

    /// Piece that must continue capturing, if a chain is in progress.
    chain: Option<PieceId>,

    /// Next id to allocate.
    next_id: PieceId,
}

impl GameState {
    /// Create an empty board with white to move.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            pieces: OrdMap::new(),
            squares: OrdMap::new(),
            to_move: Color::White,
            chain: None,
            next_id: PieceId::FIRST,
        }
    }

    /// Create a board in the standard starting formation.
    ///
    /// White fills ranks `0..3`, black the last three ranks, each on
    /// alternating squares. Ids are handed out rank by rank, white first.
    ///
    /// # Panics
    ///
    /// Panics if `size` cannot hold the formation
    /// (see [`BoardSize::fits_standard_layout`]).
    #[must_use]
    pub fn standard(size: BoardSize) -> Self {
        assert!(
            size.fits_standard_layout(),
            "Board {size} cannot hold the standard formation"
        );

        let (Ok(width), Ok(height)) = (i32::try_from(size.width), i32::try_from(size.height)) else {
            unreachable!("fits_standard_layout bounds both sides");
        };

        let mut state = Self::new(size);
        let white_ranks = 0..STARTING_RANKS;
        let black_ranks = (height - STARTING_RANKS..height).rev();

        for (color, ranks) in [
            (Color::White, white_ranks.collect::<Vec<_>>()),
            (Color::Black, black_ranks.collect::<Vec<_>>()),
        ] {
            for y in ranks {
                for x in (0..width).step_by(2) {
                    let position = Position::new(x + (y + 1) % 2, y);
                    state.place(color, Kind::Pawn, position);
                }
            }
        }

        state
    }

    /// Put a new piece on the board and return its id.
    ///
    /// Used for setup only; the rule engine never adds pieces.
    ///
    /// # Panics
    ///
    /// Panics if the square is off the board or already occupied.
    pub fn place(&mut self, color: Color, kind: Kind, position: Position) -> PieceId {
        assert!(
            self.size.contains(position),
            "Square {position} is off the {} board",
            self.size
        );
        assert!(
            !self.is_occupied(position),
            "Square {position} is already occupied"
        );

        let id = self.next_id;
        self.next_id = id.next();
        self.pieces.insert(
            id,
            Piece {
                id,
                position,
                color,
                kind,
            },
        );
        self.squares.insert(position, id);
        id
    }

    /// Set the color to move. Setup only; clears any chain.
    pub fn set_to_move(&mut self, color: Color) {
        self.to_move = color;
        self.chain = None;
    }

    // === Queries ===

    /// Board dimensions.
    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Color whose turn it is.
    #[must_use]
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// The piece that must continue capturing, if any.
    #[must_use]
    pub fn chain(&self) -> Option<PieceId> {
        self.chain
    }

    /// Current state machine phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        match self.chain {
            Some(id) => TurnPhase::ChainCapture(id),
            None => TurnPhase::ToMove(self.to_move),
        }
    }

    /// Look up a piece by id.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// The piece standing on a square.
    #[must_use]
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.squares.get(&position).and_then(|id| self.pieces.get(id))
    }

    /// Check if a square holds a piece.
    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.squares.contains_key(&position)
    }

    /// Iterate over live pieces in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Iterate over the live pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.color == color)
    }

    /// Number of live pieces.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Take a snapshot of the live pieces.
    #[must_use]
    pub fn snapshot(&self) -> PieceSnapshot {
        PieceSnapshot {
            pieces: self.pieces.clone(),
        }
    }

    // === Mutation (rule engine only) ===

    /// Move a piece to an empty square.
    pub(crate) fn relocate(&mut self, id: PieceId, target: Position) {
        debug_assert!(!self.is_occupied(target), "relocating onto {target}");
        if let Some(piece) = self.pieces.get_mut(&id) {
            self.squares.remove(&piece.position);
            piece.position = target;
            self.squares.insert(target, id);
        }
    }

    /// Take a piece off the board for good.
    pub(crate) fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;
        self.squares.remove(&piece.position);
        Some(piece)
    }

    /// Crown a pawn. Returns false if the piece is missing or already a king.
    pub(crate) fn promote(&mut self, id: PieceId) -> bool {
        match self.pieces.get_mut(&id) {
            Some(piece) if piece.kind == Kind::Pawn => {
                piece.kind = Kind::King;
                true
            }
            _ => false,
        }
    }

    /// Keep the turn with `id`, which must capture again.
    pub(crate) fn continue_chain(&mut self, id: PieceId) {
        self.chain = Some(id);
    }

    /// Clear any chain and pass the move to the opponent.
    pub(crate) fn end_turn(&mut self) {
        self.chain = None;
        self.to_move = self.to_move.opponent();
    }
}
