//! # rust-draughts
//!
//! An English draughts rule engine with a threaded command bridge for
//! networked play.
//!
//! ## Design Principles
//!
//! 1. **Rules Behind a Trait**: The session layer only sees `RuleEngine`.
//!    It seats peers and relays commands but never interprets a move.
//!
//! 2. **Rejected Means Untouched**: A failed move leaves the game exactly
//!    as it was. Errors are values, never partial updates.
//!
//! 3. **One Writer**: Reader threads only enqueue. A single scheduler
//!    thread drains the queue, so moves apply in a well-defined order.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Pieces live in `im` maps, so a
//!   `PieceSnapshot` is an O(1) clone detached from later moves.
//!
//! - **Text Commands**: A command is a name plus string parameters. The
//!   TCP transport frames one command per line.
//!
//! ## Modules
//!
//! - `core`: Positions, pieces, moves, and game state
//! - `rules`: `RuleEngine` trait and variant selection
//! - `games`: Rule engine implementations (English draughts)
//! - `protocol`: Commands and the request/reply vocabulary
//! - `channel`: Multi-producer, single-consumer command queue
//! - `session`: Peer seating and command dispatch around one engine
//! - `server`: TCP transport and scheduler
//! - `config`: Server configuration
//! - `error`: Error types

pub mod channel;
pub mod config;
pub mod core;
pub mod error;
pub mod games;
pub mod protocol;
pub mod rules;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    BoardSize, Color, GameState, Kind, Move, MoveResult, Moves, Piece, PieceId, PieceSnapshot,
    Position, TurnPhase,
};

pub use crate::rules::{RuleEngine, Variant};

pub use crate::games::english::{EnglishDraughts, EnglishDraughtsBuilder};

pub use crate::protocol::{Command, Reply, Request};

pub use crate::channel::{command_channel, CommandChannel, CommandSender};

pub use crate::session::{Inbound, Outbox, PeerId, Seat, SessionCoordinator};

pub use crate::server::{Server, ServerHandle};

pub use crate::config::ServerConfig;

pub use crate::error::{ConfigError, MoveError, ProtocolError, ServerError, SessionError};
