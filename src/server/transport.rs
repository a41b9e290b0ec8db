//! Line-framed transport: one command per `\n`-terminated line.

use std::io::{self, BufRead, BufReader, Read, Write};

use crossbeam_channel::Receiver;

use crate::channel::CommandSender;
use crate::protocol::Command;
use crate::session::{Inbound, Outbox, PeerId};

/// Writes each command as one line and flushes.
#[derive(Debug)]
pub struct LineOutbox<W> {
    writer: W,
}

impl<W: Write> LineOutbox<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Outbox for LineOutbox<W> {
    fn deliver(&mut self, command: &Command) -> io::Result<()> {
        writeln!(self.writer, "{}", command.encode())?;
        self.writer.flush()
    }
}

/// Write every command queued for a peer until the queue's sender is
/// dropped or a write fails.
///
/// Runs on the peer's own thread, so a client that stops reading only
/// stalls this loop, never the coordinator.
pub fn write_commands<W: Write + Send>(writer: W, peer: PeerId, queue: &Receiver<Command>) {
    let mut outbox = LineOutbox::new(writer);
    for command in queue {
        if let Err(err) = outbox.deliver(&command) {
            tracing::warn!("Write error to {}: {}", peer, err);
            return;
        }
    }
}

/// Read lines from a peer until the stream ends, pushing each decoded
/// command onto the channel.
///
/// Blank lines are skipped. Lines that are not UTF-8 or not a command are
/// logged and dropped; the connection stays up. When the stream ends, for
/// any reason, `Inbound::Closed` is pushed last. Returns early if the
/// channel's consumer is gone.
pub fn read_commands<R: Read>(reader: R, peer: PeerId, sender: &CommandSender<Inbound>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = match std::str::from_utf8(&buf) {
                    Ok(line) => line,
                    Err(err) => {
                        tracing::warn!("Invalid command from {}: not UTF-8 ({})", peer, err);
                        continue;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match Command::decode(trimmed) {
                    Ok(command) => {
                        if !sender.push(Inbound::Command { peer, command }) {
                            return;
                        }
                    }
                    Err(err) => tracing::warn!("Invalid command from {}: {} ({})", peer, trimmed, err),
                }
            }
            Err(err) => {
                tracing::warn!("Read error from {}: {}", peer, err);
                break;
            }
        }
    }
    sender.push(Inbound::Closed { peer });
}
