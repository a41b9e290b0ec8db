//! Session coordinator: the engine, the seated peers, and the glue between
//! them.
//!
//! ## Locking
//!
//! Two `parking_lot` mutexes guard the shared state:
//! - `peers`: seat table and outboxes
//! - `engine`: the selected rule engine, if any
//!
//! When both are needed, `peers` is always taken first. Queries only ever
//! take `engine`.
//!
//! Outboxes are called with `peers` held, so an outbox must not block on a
//! slow client. The TCP server hands out channel-backed outboxes and writes
//! to sockets from per-peer threads.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::core::{BoardSize, Color, MoveResult, PieceId, PieceSnapshot, Position, TurnPhase};
use crate::error::{ConfigError, MoveError, SessionError};
use crate::protocol::{Command, Reply, Request};
use crate::rules::{RuleEngine, Variant};

use super::peer::{Inbound, Outbox, PeerId, Seat};

/// A seated peer.
struct Peer {
    color: Color,
    outbox: Box<dyn Outbox>,
}

/// Seat table.
struct Peers {
    seated: FxHashMap<PeerId, Peer>,
    next_id: u32,
}

impl Peers {
    fn send(&mut self, peer: PeerId, command: &Command) {
        if let Some(seated) = self.seated.get_mut(&peer) {
            deliver(peer, seated.outbox.as_mut(), command);
        }
    }

    fn broadcast(&mut self, command: &Command) {
        for (&peer, seated) in &mut self.seated {
            deliver(peer, seated.outbox.as_mut(), command);
        }
    }
}

/// Write failures are only logged. A broken connection shows up on the
/// reader side as a close, which is what removes the peer.
fn deliver(peer: PeerId, outbox: &mut dyn Outbox, command: &Command) {
    if let Err(err) = outbox.deliver(command) {
        tracing::warn!("Failed to deliver '{}' to {}: {}", command, peer, err);
    }
}

/// Owns the rule engine of one session and the peers playing it.
///
/// Shared between the accept loop (which seats peers) and the scheduler
/// (which feeds it commands), typically behind an `Arc`.
pub struct SessionCoordinator {
    variant: Variant,
    engine: Mutex<Option<Box<dyn RuleEngine>>>,
    peers: Mutex<Peers>,
}

impl SessionCoordinator {
    /// Create a coordinator with no engine selected.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            engine: Mutex::new(None),
            peers: Mutex::new(Peers {
                seated: FxHashMap::default(),
                next_id: 0,
            }),
        }
    }

    /// Create a coordinator and select a fresh engine for `size`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBoard`] if the variant cannot use `size`.
    pub fn with_board(variant: Variant, size: BoardSize) -> Result<Self, ConfigError> {
        let coordinator = Self::new(variant);
        coordinator.select_engine(size)?;
        Ok(coordinator)
    }

    /// Variant this session plays.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Select a fresh engine in the starting position.
    ///
    /// Replaces any engine already selected.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBoard`] if the variant cannot use `size`.
    pub fn select_engine(&self, size: BoardSize) -> Result<(), ConfigError> {
        let engine = self.variant.create(size)?;
        self.install_engine(engine);
        Ok(())
    }

    /// Select an already built engine, e.g. one set up mid-game.
    pub fn install_engine(&self, engine: Box<dyn RuleEngine>) {
        let size = engine.board_size();
        *self.engine.lock() = Some(engine);
        tracing::info!("Engine selected: {} on {} board", self.variant, size);
    }

    /// Check if an engine has been selected.
    #[must_use]
    pub fn has_engine(&self) -> bool {
        self.engine.lock().is_some()
    }

    fn with_engine<R>(&self, f: impl FnOnce(&mut dyn RuleEngine) -> R) -> Result<R, SessionError> {
        let mut engine = self.engine.lock();
        let engine = engine.as_deref_mut().ok_or(SessionError::EngineUnavailable)?;
        Ok(f(engine))
    }

    // =========================================================================
    // Queries
    //
    // Each query runs under the engine lock. Without an engine they answer
    // "nothing" rather than failing.
    // =========================================================================

    /// Board dimensions, if an engine is selected.
    #[must_use]
    pub fn board_size(&self) -> Option<BoardSize> {
        self.with_engine(|engine| engine.board_size()).ok()
    }

    /// Color to move, if an engine is selected.
    #[must_use]
    pub fn current_color(&self) -> Option<Color> {
        self.with_engine(|engine| engine.current_color()).ok()
    }

    /// Turn phase, if an engine is selected.
    #[must_use]
    pub fn phase(&self) -> Option<TurnPhase> {
        self.with_engine(|engine| engine.phase()).ok()
    }

    /// Snapshot of the live pieces; empty without an engine.
    #[must_use]
    pub fn list_pieces(&self) -> PieceSnapshot {
        self.with_engine(|engine| engine.list_pieces()).unwrap_or_default()
    }

    /// Legal destinations of a piece; empty without an engine.
    #[must_use]
    pub fn list_moves(&self, piece: PieceId) -> Vec<Position> {
        self.with_engine(|engine| engine.list_moves(piece)).unwrap_or_default()
    }

    // =========================================================================
    // Peers
    // =========================================================================

    /// Seat a new peer on the lowest free color.
    ///
    /// The peer is greeted with `hello`, then brought up to date with
    /// `board` and one `piece` per live piece before any later broadcast
    /// can reach it.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionFull`] if every color is taken. The outbox is
    /// dropped without being written to.
    pub fn connect(&self, mut outbox: Box<dyn Outbox>) -> Result<Seat, SessionError> {
        let mut peers = self.peers.lock();

        let color = self
            .variant
            .colors()
            .iter()
            .copied()
            .find(|color| peers.seated.values().all(|peer| peer.color != *color))
            .ok_or(SessionError::SessionFull(self.variant.seats()))?;

        peers.next_id += 1;
        let peer = PeerId(peers.next_id);

        deliver(peer, outbox.as_mut(), &Reply::Hello { color }.to_command());
        for command in self.sync_commands() {
            deliver(peer, outbox.as_mut(), &command);
        }

        peers.seated.insert(peer, Peer { color, outbox });
        tracing::info!("{} seated as {}", peer, color);

        Ok(Seat { peer, color })
    }

    /// `board` plus one `piece` per live piece. Nothing without an engine.
    fn sync_commands(&self) -> Vec<Command> {
        let Ok((size, pieces)) = self.with_engine(|engine| (engine.board_size(), engine.list_pieces())) else {
            return Vec::new();
        };
        std::iter::once(Reply::Board { size }.to_command())
            .chain(pieces.iter().map(|piece| Reply::Piece(*piece).to_command()))
            .collect()
    }

    /// Remove a peer, freeing its color. Returns false if it was not seated.
    pub fn disconnect(&self, peer: PeerId) -> bool {
        let removed = self.peers.lock().seated.remove(&peer);
        match removed {
            Some(seated) => {
                tracing::info!("{} ({}) disconnected", peer, seated.color);
                true
            }
            None => false,
        }
    }

    /// Currently seated peers, ordered by id.
    #[must_use]
    pub fn seats(&self) -> Vec<Seat> {
        let peers = self.peers.lock();
        let mut seats: Vec<Seat> = peers
            .seated
            .iter()
            .map(|(&peer, seated)| Seat {
                peer,
                color: seated.color,
            })
            .collect();
        seats.sort_by_key(|seat| seat.peer);
        seats
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Process one item from the inbound queue.
    ///
    /// Rejected commands change nothing and produce no output; the reason
    /// is logged at debug level.
    pub fn dispatch(&self, inbound: Inbound) {
        match inbound {
            Inbound::Command { peer, command } => {
                if let Err(err) = self.handle(peer, &command) {
                    tracing::debug!("Dropped '{}' from {}: {}", command, peer, err);
                }
            }
            Inbound::Closed { peer } => {
                self.disconnect(peer);
            }
        }
    }

    /// Carry out one command from a peer.
    ///
    /// - `move`: on success, `moved` is broadcast to every seated peer
    /// - `moves`: the destinations go back to the requester only
    ///
    /// # Errors
    ///
    /// - [`SessionError::Protocol`] if the command is not a valid request
    /// - Anything [`apply_move`](Self::apply_move) returns
    pub fn handle(&self, peer: PeerId, command: &Command) -> Result<(), SessionError> {
        match Request::try_from(command)? {
            Request::Move { piece, target } => {
                self.apply_move(peer, piece, target)?;
            }
            Request::Moves { piece } => {
                let mut peers = self.peers.lock();
                if !peers.seated.contains_key(&peer) {
                    return Err(SessionError::UnknownPeer(peer));
                }
                let targets = self.with_engine(|engine| engine.list_moves(piece))?;
                peers.send(peer, &Reply::Moves { piece, targets }.to_command());
            }
        }
        Ok(())
    }

    /// Move a piece on behalf of a peer and broadcast the result.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownPeer`] if `peer` is not seated
    /// - [`SessionError::EngineUnavailable`] if no engine is selected
    /// - [`SessionError::NotOwner`] if the piece belongs to the other color
    /// - [`SessionError::Move`] if the engine rejects the move
    pub fn apply_move(&self, peer: PeerId, piece: PieceId, target: Position) -> Result<MoveResult, SessionError> {
        let mut peers = self.peers.lock();
        let color = peers
            .seated
            .get(&peer)
            .map(|seated| seated.color)
            .ok_or(SessionError::UnknownPeer(peer))?;

        let result = self.with_engine(|engine| -> Result<MoveResult, SessionError> {
            let owner = engine
                .list_pieces()
                .get(piece)
                .map(|found| found.color)
                .ok_or(MoveError::NoSuchPiece(piece))?;
            if owner != color {
                return Err(SessionError::NotOwner { peer, piece });
            }
            Ok(engine.move_piece(piece, target)?)
        })??;

        tracing::debug!("{} moved {} to {}", peer, piece, target);
        peers.broadcast(&Reply::Moved { piece, result }.to_command());
        Ok(result)
    }
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("variant", &self.variant)
            .field("has_engine", &self.has_engine())
            .field("seats", &self.seats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver};

    fn inbox() -> (Box<dyn Outbox>, Receiver<Command>) {
        let (sender, receiver) = unbounded();
        (Box::new(sender), receiver)
    }

    fn texts(receiver: &Receiver<Command>) -> Vec<String> {
        receiver.try_iter().map(|command| command.encode()).collect()
    }

    #[test]
    fn test_queries_without_engine() {
        let coordinator = SessionCoordinator::new(Variant::EnglishDraughts);

        assert!(!coordinator.has_engine());
        assert_eq!(coordinator.board_size(), None);
        assert_eq!(coordinator.current_color(), None);
        assert!(coordinator.list_pieces().is_empty());
        assert!(coordinator.list_moves(PieceId(1)).is_empty());
    }

    #[test]
    fn test_connect_without_engine_only_greets() {
        let coordinator = SessionCoordinator::new(Variant::EnglishDraughts);
        let (outbox, receiver) = inbox();

        let seat = coordinator.connect(outbox).unwrap();
        assert_eq!(seat.color, Color::White);
        assert_eq!(texts(&receiver), vec!["hello white"]);
    }

    #[test]
    fn test_connect_syncs_board() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();
        let (outbox, receiver) = inbox();
        coordinator.connect(outbox).unwrap();

        let lines = texts(&receiver);
        assert_eq!(lines[0], "hello white");
        assert_eq!(lines[1], "board 8 8");
        assert_eq!(lines.len(), 2 + 24);
        assert_eq!(lines[2], "piece 1 1 0 white pawn");
    }

    #[test]
    fn test_seats_fill_in_order() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();

        let white = coordinator.connect(inbox().0).unwrap();
        let black = coordinator.connect(inbox().0).unwrap();
        assert_eq!(white.color, Color::White);
        assert_eq!(black.color, Color::Black);
        assert_ne!(white.peer, black.peer);

        let full = coordinator.connect(inbox().0);
        assert_eq!(full, Err(SessionError::SessionFull(2)));
    }

    #[test]
    fn test_freed_color_is_reused() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();
        let white = coordinator.connect(inbox().0).unwrap();
        coordinator.connect(inbox().0).unwrap();

        assert!(coordinator.disconnect(white.peer));
        assert!(!coordinator.disconnect(white.peer));

        let again = coordinator.connect(inbox().0).unwrap();
        assert_eq!(again.color, Color::White);
        assert_ne!(again.peer, white.peer);
    }

    #[test]
    fn test_move_is_broadcast() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();
        let (white_box, white_rx) = inbox();
        let (black_box, black_rx) = inbox();
        let white = coordinator.connect(white_box).unwrap();
        coordinator.connect(black_box).unwrap();
        white_rx.try_iter().count();
        black_rx.try_iter().count();

        // Piece 9 is the white pawn at (1, 2).
        coordinator.dispatch(Inbound::Command {
            peer: white.peer,
            command: Command::decode("move 9 0 3").unwrap(),
        });

        assert_eq!(texts(&white_rx), vec!["moved 9 0 3 none false true"]);
        assert_eq!(texts(&black_rx), vec!["moved 9 0 3 none false true"]);
        assert_eq!(coordinator.current_color(), Some(Color::Black));
    }

    #[test]
    fn test_rejected_commands_are_silent() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();
        let (white_box, white_rx) = inbox();
        let (black_box, black_rx) = inbox();
        let white = coordinator.connect(white_box).unwrap();
        let black = coordinator.connect(black_box).unwrap();
        white_rx.try_iter().count();
        black_rx.try_iter().count();
        let before = coordinator.list_pieces();

        for (peer, text) in [
            (white.peer, "move 9 1 3"),  // not diagonal
            (black.peer, "move 24 1 4"), // white's turn
            (black.peer, "move 9 0 3"),  // white's piece
            (white.peer, "move 99 0 3"), // no such piece
            (white.peer, "jump 9 0 3"),  // unknown command
            (PeerId(42), "move 9 0 3"),  // unseated peer
        ] {
            coordinator.dispatch(Inbound::Command {
                peer,
                command: Command::decode(text).unwrap(),
            });
        }

        assert!(texts(&white_rx).is_empty());
        assert!(texts(&black_rx).is_empty());
        assert_eq!(coordinator.list_pieces(), before);
        assert_eq!(coordinator.current_color(), Some(Color::White));
    }

    #[test]
    fn test_not_owner_error() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();
        coordinator.connect(inbox().0).unwrap();
        let black = coordinator.connect(inbox().0).unwrap();

        let result = coordinator.apply_move(black.peer, PieceId(9), Position::new(0, 3));
        assert_eq!(
            result,
            Err(SessionError::NotOwner {
                peer: black.peer,
                piece: PieceId(9),
            })
        );
    }

    #[test]
    fn test_moves_reply_goes_to_requester() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();
        let (white_box, white_rx) = inbox();
        let (black_box, black_rx) = inbox();
        let white = coordinator.connect(white_box).unwrap();
        coordinator.connect(black_box).unwrap();
        white_rx.try_iter().count();
        black_rx.try_iter().count();

        coordinator
            .handle(white.peer, &Command::decode("moves 9").unwrap())
            .unwrap();

        assert_eq!(texts(&white_rx), vec!["moves 9 2 3 0 3"]);
        assert!(texts(&black_rx).is_empty());
    }

    #[test]
    fn test_move_without_engine() {
        let coordinator = SessionCoordinator::new(Variant::EnglishDraughts);
        let white = coordinator.connect(inbox().0).unwrap();

        let result = coordinator.apply_move(white.peer, PieceId(9), Position::new(0, 3));
        assert_eq!(result, Err(SessionError::EngineUnavailable));
    }

    #[test]
    fn test_closed_frees_seat() {
        let coordinator = SessionCoordinator::with_board(Variant::EnglishDraughts, BoardSize::STANDARD).unwrap();
        let white = coordinator.connect(inbox().0).unwrap();

        coordinator.dispatch(Inbound::Closed { peer: white.peer });
        assert!(coordinator.seats().is_empty());
    }
}
