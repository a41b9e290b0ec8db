//! English draughts implementation.

use crate::core::{
    BoardSize, Color, GameState, Kind, Move, MoveResult, Moves, Piece, PieceId, PieceSnapshot, Position,
    TurnPhase,
};
use crate::error::MoveError;
use crate::rules::RuleEngine;

/// English draughts game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnglishDraughts {
    state: GameState,
}

/// Builder for positions other than the starting formation.
///
/// Starts from an empty 8x8 board with white to move.
///
/// ```
/// use rust_draughts::core::{Color, Kind, Position};
/// use rust_draughts::games::english::EnglishDraughtsBuilder;
/// use rust_draughts::rules::RuleEngine;
///
/// let game = EnglishDraughtsBuilder::new()
///     .piece(Color::White, Kind::Pawn, Position::new(1, 2))
///     .piece(Color::Black, Kind::Pawn, Position::new(2, 3))
///     .build();
///
/// assert_eq!(game.list_pieces().len(), 2);
/// ```
pub struct EnglishDraughtsBuilder {
    size: BoardSize,
    to_move: Color,
    pieces: Vec<(Color, Kind, Position)>,
}

impl Default for EnglishDraughtsBuilder {
    fn default() -> Self {
        Self {
            size: BoardSize::STANDARD,
            to_move: Color::White,
            pieces: Vec::new(),
        }
    }
}

impl EnglishDraughtsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board_size(mut self, width: u32, height: u32) -> Self {
        self.size = BoardSize::new(width, height);
        self
    }

    pub fn to_move(mut self, color: Color) -> Self {
        self.to_move = color;
        self
    }

    /// Add a piece. Ids are allocated in the order pieces are added.
    pub fn piece(mut self, color: Color, kind: Kind, position: Position) -> Self {
        self.pieces.push((color, kind, position));
        self
    }

    /// Build the game.
    ///
    /// # Panics
    ///
    /// Panics if two pieces share a square or a piece is off the board.
    pub fn build(self) -> EnglishDraughts {
        let mut state = GameState::new(self.size);
        for (color, kind, position) in self.pieces {
            state.place(color, kind, position);
        }
        state.set_to_move(self.to_move);
        EnglishDraughts::from_state(state)
    }
}

impl EnglishDraughts {
    /// Create a game in the standard starting formation.
    ///
    /// # Panics
    ///
    /// Panics if the board cannot hold the formation; use
    /// [`crate::rules::Variant::create`] for a checked constructor.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self::from_state(GameState::standard(size))
    }

    /// Wrap an existing state.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Read access to the full state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Legal moves for a piece, including what each would capture.
    #[must_use]
    pub fn legal_moves(&self, id: PieceId) -> Moves {
        match self.state.piece(id) {
            Some(piece) => self.piece_moves(piece, self.has_captures()),
            None => Moves::new(),
        }
    }

    /// Check if the side to move has a capture anywhere on the board.
    ///
    /// While a chain is in progress only the chain piece is considered.
    #[must_use]
    pub fn has_captures(&self) -> bool {
        self.state
            .pieces_of(self.state.to_move())
            .any(|piece| !self.piece_moves(piece, true).is_empty())
    }

    /// Moves for one piece.
    ///
    /// With `force_capture` set (or a chain in progress) only captures are
    /// listed.
    fn piece_moves(&self, piece: &Piece, force_capture: bool) -> Moves {
        let mut moves = Moves::new();

        if let Some(chain) = self.state.chain() {
            if chain != piece.id {
                return moves;
            }
        }
        if piece.color != self.state.to_move() {
            return moves;
        }

        let must_capture = force_capture || self.state.chain().is_some();
        for &(dx, dy) in piece.directions() {
            if let Some(m) = self.check_direction(piece, dx, dy, must_capture) {
                moves.push(m);
            }
        }
        moves
    }

    /// The move, if any, a piece can make along one diagonal.
    fn check_direction(&self, piece: &Piece, dx: i32, dy: i32, must_capture: bool) -> Option<Move> {
        let size = self.state.size();
        let adjacent = piece.position.offset(dx, dy);
        if !size.contains(adjacent) {
            return None;
        }

        let Some(jumped) = self.state.piece_at(adjacent) else {
            return (!must_capture).then_some(Move::step(adjacent));
        };

        if jumped.color == piece.color {
            return None;
        }

        let landing = adjacent.offset(dx, dy);
        if !size.contains(landing) || self.state.is_occupied(landing) {
            return None;
        }

        Some(Move::capture(landing, jumped.id))
    }
}

impl RuleEngine for EnglishDraughts {
    fn board_size(&self) -> BoardSize {
        self.state.size()
    }

    fn current_color(&self) -> Color {
        self.state.to_move()
    }

    fn list_pieces(&self) -> PieceSnapshot {
        self.state.snapshot()
    }

    fn list_moves(&self, piece: PieceId) -> Vec<Position> {
        self.legal_moves(piece).iter().map(|m| m.target).collect()
    }

    fn move_piece(&mut self, id: PieceId, target: Position) -> Result<MoveResult, MoveError> {
        let piece = *self.state.piece(id).ok_or(MoveError::NoSuchPiece(id))?;

        let chosen = self
            .piece_moves(&piece, self.has_captures())
            .into_iter()
            .find(|m| m.target == target)
            .ok_or(MoveError::IllegalMove { piece: id, target })?;

        // Everything below is infallible; the state only changes from here.
        self.state.relocate(id, target);
        if let Some(captured) = chosen.captured {
            self.state.remove(captured);
        }

        // Crowning happens before the follow-up check, so a freshly crowned
        // king may keep capturing backwards.
        let promoted = piece.kind == Kind::Pawn
            && target.y == self.state.size().promotion_rank(piece.color)
            && self.state.promote(id);

        let chain_continues = chosen.is_capture()
            && self
                .state
                .piece(id)
                .is_some_and(|moved| !self.piece_moves(moved, true).is_empty());

        if chain_continues {
            self.state.continue_chain(id);
        } else {
            self.state.end_turn();
        }

        Ok(MoveResult {
            position: target,
            captured: chosen.captured,
            promoted,
            end_turn: !chain_continues,
        })
    }

    fn phase(&self) -> TurnPhase {
        self.state.phase()
    }
}
