//! Error types for every layer of the crate.
//!
//! Only startup failures are fatal. Everything raised while a session is
//! running (bad moves, garbled commands, queries before the engine exists)
//! is absorbed where it happens and leaves the game untouched.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::{BoardSize, PieceId, Position};
use crate::session::PeerId;

/// A rejected move request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// No live piece has this id.
    #[error("no such piece: {0}")]
    NoSuchPiece(PieceId),

    /// The target is not among the piece's legal destinations.
    #[error("illegal move: {piece} cannot move to {target}")]
    IllegalMove {
        /// The piece asked to move.
        piece: PieceId,
        /// The requested destination.
        target: Position,
    },
}

/// Malformed or unrecognized command text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line held no tokens.
    #[error("empty command")]
    Empty,

    /// The command name is not part of the vocabulary.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A required parameter is absent.
    #[error("{command}: missing parameter {index}")]
    MissingParameter {
        /// Command name.
        command: String,
        /// Zero-based index of the missing parameter.
        index: usize,
    },

    /// A parameter could not be parsed.
    #[error("{command}: invalid parameter {value:?}")]
    InvalidParameter {
        /// Command name.
        command: String,
        /// The offending token.
        value: String,
    },

    /// More parameters than the command takes.
    #[error("{command}: expected {expected} parameters, got {found}")]
    TooManyParameters {
        /// Command name.
        command: String,
        /// Parameters the command takes.
        expected: usize,
        /// Parameters received.
        found: usize,
    },
}

/// A request the session coordinator could not carry out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No engine has been selected for the session yet.
    #[error("no engine selected")]
    EngineUnavailable,

    /// Every color already has a peer.
    #[error("session full: all {0} seats taken")]
    SessionFull(usize),

    /// The peer is not (or no longer) seated.
    #[error("unknown peer: {0}")]
    UnknownPeer(PeerId),

    /// The peer asked to move a piece of the other color.
    #[error("{peer} does not own {piece}")]
    NotOwner {
        /// The requesting peer.
        peer: PeerId,
        /// The piece it asked to move.
        piece: PieceId,
    },

    /// The engine rejected the move.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// The command could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Invalid or unreadable server configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for `ServerConfig`.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The board cannot hold the variant's starting formation.
    #[error("board {0} cannot hold the starting formation")]
    InvalidBoard(BoardSize),

    /// The scheduler tick rate is zero.
    #[error("tick rate must be positive")]
    InvalidTickRate,
}

/// Fatal server failures.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listening endpoint could not be created.
    #[error("failed to bind {addr}: {source}")]
    Startup {
        /// Address the server tried to bind.
        addr: SocketAddr,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
