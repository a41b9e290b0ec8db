//! Typed command vocabularies.
//!
//! ## Client → server
//!
//! | Command                | Meaning                                  |
//! |------------------------|------------------------------------------|
//! | `move <id> <x> <y>`    | Move a piece to a square                 |
//! | `moves <id>`           | Ask for a piece's legal destinations     |
//!
//! ## Server → client
//!
//! | Command                                         | Meaning                      |
//! |-------------------------------------------------|------------------------------|
//! | `hello <color>`                                 | Seat assignment, sent once   |
//! | `board <w> <h>`                                 | Board dimensions             |
//! | `piece <id> <x> <y> <color> <kind>`             | One live piece               |
//! | `moved <id> <x> <y> <captured> <promoted> <end>` | An executed move            |
//! | `moves <id> [<x> <y>]...`                       | Legal destinations of a piece |
//!
//! `<captured>` is a piece id or `none`; flags are `true`/`false`.

use crate::core::{BoardSize, Color, Kind, MoveResult, Piece, PieceId, Position};
use crate::error::ProtocolError;

use super::command::{Command, NONE_TOKEN};

/// Command names.
pub mod names {
    pub const HELLO: &str = "hello";
    pub const BOARD: &str = "board";
    pub const PIECE: &str = "piece";
    pub const MOVE: &str = "move";
    pub const MOVED: &str = "moved";
    pub const MOVES: &str = "moves";
}

/// A request from a peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Move `piece` to `target`.
    Move { piece: PieceId, target: Position },
    /// List the legal destinations of `piece`.
    Moves { piece: PieceId },
}

impl Request {
    /// Parse a request from command text.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`] from splitting or interpreting the text.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Self::try_from(&Command::decode(text)?)
    }

    /// Command form of this request.
    #[must_use]
    pub fn to_command(&self) -> Command {
        match *self {
            Request::Move { piece, target } => Command::build(names::MOVE).param(piece).param(target).finish(),
            Request::Moves { piece } => Command::build(names::MOVES).param(piece).finish(),
        }
    }
}

impl TryFrom<&Command> for Request {
    type Error = ProtocolError;

    fn try_from(command: &Command) -> Result<Self, Self::Error> {
        let mut args = Args::new(command);
        let request = match command.name() {
            names::MOVE => Request::Move {
                piece: args.piece()?,
                target: args.position()?,
            },
            names::MOVES => Request::Moves { piece: args.piece()? },
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };
        args.finish()?;
        Ok(request)
    }
}

/// A message to a peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// The color this peer controls.
    Hello { color: Color },
    /// Board dimensions.
    Board { size: BoardSize },
    /// One live piece, sent while syncing a new peer.
    Piece(Piece),
    /// `piece` was moved.
    Moved { piece: PieceId, result: MoveResult },
    /// Legal destinations of `piece`.
    Moves { piece: PieceId, targets: Vec<Position> },
}

impl Reply {
    /// Parse a reply from command text.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`] from splitting or interpreting the text.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Self::try_from(&Command::decode(text)?)
    }

    /// Command form of this reply.
    #[must_use]
    pub fn to_command(&self) -> Command {
        match self {
            Reply::Hello { color } => Command::build(names::HELLO).param(*color).finish(),
            Reply::Board { size } => Command::build(names::BOARD)
                .param(size.width)
                .param(size.height)
                .finish(),
            Reply::Piece(piece) => Command::build(names::PIECE)
                .param(piece.id)
                .param(piece.position)
                .param(piece.color)
                .param(piece.kind)
                .finish(),
            Reply::Moved { piece, result } => Command::build(names::MOVED)
                .param(*piece)
                .param(result.position)
                .param(result.captured)
                .param(result.promoted)
                .param(result.end_turn)
                .finish(),
            Reply::Moves { piece, targets } => {
                let mut command = Command::build(names::MOVES).param(*piece).finish();
                for target in targets {
                    command.push(*target);
                }
                command
            }
        }
    }
}

impl TryFrom<&Command> for Reply {
    type Error = ProtocolError;

    fn try_from(command: &Command) -> Result<Self, Self::Error> {
        let mut args = Args::new(command);
        let reply = match command.name() {
            names::HELLO => Reply::Hello { color: args.color()? },
            names::BOARD => Reply::Board {
                size: BoardSize::new(args.number()?, args.number()?),
            },
            names::PIECE => Reply::Piece(Piece {
                id: args.piece()?,
                position: args.position()?,
                color: args.color()?,
                kind: args.kind()?,
            }),
            names::MOVED => Reply::Moved {
                piece: args.piece()?,
                result: MoveResult {
                    position: args.position()?,
                    captured: args.optional_piece()?,
                    promoted: args.flag()?,
                    end_turn: args.flag()?,
                },
            },
            names::MOVES => {
                let piece = args.piece()?;
                let mut targets = Vec::new();
                while args.remaining() > 0 {
                    targets.push(args.position()?);
                }
                Reply::Moves { piece, targets }
            }
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };
        args.finish()?;
        Ok(reply)
    }
}

/// Cursor over a command's parameters with typed accessors.
struct Args<'a> {
    command: &'a Command,
    index: usize,
}

impl<'a> Args<'a> {
    fn new(command: &'a Command) -> Self {
        Self { command, index: 0 }
    }

    fn remaining(&self) -> usize {
        self.command.params().len().saturating_sub(self.index)
    }

    fn next(&mut self) -> Result<&'a str, ProtocolError> {
        let token = self
            .command
            .param(self.index)
            .ok_or_else(|| ProtocolError::MissingParameter {
                command: self.command.name().to_string(),
                index: self.index,
            })?;
        self.index += 1;
        Ok(token)
    }

    fn invalid(&self, value: &str) -> ProtocolError {
        ProtocolError::InvalidParameter {
            command: self.command.name().to_string(),
            value: value.to_string(),
        }
    }

    fn parse<T: std::str::FromStr>(&mut self) -> Result<T, ProtocolError> {
        let token = self.next()?;
        token.parse().map_err(|_| self.invalid(token))
    }

    fn number(&mut self) -> Result<u32, ProtocolError> {
        self.parse()
    }

    fn piece(&mut self) -> Result<PieceId, ProtocolError> {
        self.parse().map(PieceId)
    }

    fn optional_piece(&mut self) -> Result<Option<PieceId>, ProtocolError> {
        let token = self.next()?;
        if token == NONE_TOKEN {
            return Ok(None);
        }
        token.parse().map(|id| Some(PieceId(id))).map_err(|_| self.invalid(token))
    }

    fn position(&mut self) -> Result<Position, ProtocolError> {
        Ok(Position::new(self.parse()?, self.parse()?))
    }

    fn flag(&mut self) -> Result<bool, ProtocolError> {
        self.parse()
    }

    fn color(&mut self) -> Result<Color, ProtocolError> {
        let token = self.next()?;
        Color::parse(token).ok_or_else(|| self.invalid(token))
    }

    fn kind(&mut self) -> Result<Kind, ProtocolError> {
        let token = self.next()?;
        Kind::parse(token).ok_or_else(|| self.invalid(token))
    }

    /// Reject leftover parameters.
    fn finish(&self) -> Result<(), ProtocolError> {
        let found = self.command.params().len();
        if found > self.index {
            return Err(ProtocolError::TooManyParameters {
                command: self.command.name().to_string(),
                expected: self.index,
                found,
            });
        }
        Ok(())
    }
}
