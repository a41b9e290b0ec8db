//! Peers: identity, seat assignment, and the outbound side of a transport.

use std::io;

use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::protocol::Command;

/// Identifier for one connection, unique for the session's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub u32);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Peer({})", self.0)
    }
}

/// A peer's place in the session: who it is and which color it plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seat {
    pub peer: PeerId,
    pub color: Color,
}

/// Items flowing from reader threads to the scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    /// A peer sent a command.
    Command { peer: PeerId, command: Command },
    /// A peer's connection closed. Queued behind anything it sent before.
    Closed { peer: PeerId },
}

/// Outbound half of a transport.
///
/// The coordinator hands every command for a peer to that peer's outbox.
/// Framing is up to the implementation.
pub trait Outbox: Send {
    /// Write one command.
    ///
    /// # Errors
    ///
    /// Any I/O failure of the underlying connection.
    fn deliver(&mut self, command: &Command) -> io::Result<()>;
}

/// In-process peers: commands go straight onto a channel.
impl Outbox for crossbeam_channel::Sender<Command> {
    fn deliver(&mut self, command: &Command) -> io::Result<()> {
        self.send(command.clone())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer receiver dropped"))
    }
}
