//! TCP server: accepts peers, reads their commands, and runs the scheduler.
//!
//! ## Threads
//!
//! - Accept loop: seats each new connection with the coordinator and gives
//!   it a reader and a writer thread. Connections past the last free seat are closed.
//! - One reader per peer: decodes lines onto the command channel.
//! - One writer per peer: drains that peer's outbound queue onto the socket
//!   through a [`LineOutbox`].
//! - Scheduler: drains the channel into the coordinator every tick.
//!
//! The coordinator never touches a socket; a client that stops reading
//! only backs up its own outbound queue.

mod scheduler;
mod transport;

pub use scheduler::Scheduler;
pub use transport::{read_commands, write_commands, LineOutbox};

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::channel::{command_channel, CommandSender};
use crate::config::ServerConfig;
use crate::error::{ServerError, SessionError};
use crate::protocol::Command;
use crate::session::{Inbound, SessionCoordinator};

/// How long the accept loop sleeps when no connection is waiting.
const ACCEPT_POLL: Duration = Duration::from_millis(20);

/// A bound, not yet running server.
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    coordinator: Arc<SessionCoordinator>,
}

impl Server {
    /// Validate the configuration, select the engine and bind the listener.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Config`] if the configuration is invalid
    /// - [`ServerError::Startup`] if the address cannot be bound
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let coordinator = Arc::new(SessionCoordinator::with_board(config.variant, config.board)?);

        let startup = |source: io::Error| ServerError::Startup {
            addr: config.bind,
            source,
        };
        let listener = TcpListener::bind(config.bind).map_err(startup)?;
        let local_addr = listener.local_addr().map_err(startup)?;
        listener.set_nonblocking(true).map_err(startup)?;

        tracing::info!("Listening on {} ({} on {} board)", local_addr, config.variant, config.board);

        Ok(Self {
            config,
            listener,
            local_addr,
            coordinator,
        })
    }

    /// Address actually bound. Differs from the configured one for port 0.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The session this server feeds.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.coordinator
    }

    /// Start the accept loop and scheduler on background threads.
    pub fn spawn(self) -> ServerHandle {
        let (sender, channel) = command_channel();
        let (stop, shutdown) = crossbeam_channel::bounded::<()>(0);

        let scheduler = Scheduler::new(Arc::clone(&self.coordinator), channel, self.config.tick_interval());
        let scheduler_shutdown = shutdown.clone();
        let scheduler = thread::spawn(move || scheduler.run(&scheduler_shutdown));

        let coordinator = Arc::clone(&self.coordinator);
        let listener = self.listener;
        let acceptor = thread::spawn(move || accept_loop(&listener, &coordinator, &sender, &shutdown));

        ServerHandle {
            local_addr: self.local_addr,
            coordinator: self.coordinator,
            stop,
            threads: vec![acceptor, scheduler],
        }
    }

    /// Run in the foreground. Only returns if the server's threads die.
    pub fn run(self) {
        self.spawn().wait();
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.local_addr)
            .field("config", &self.config)
            .finish()
    }
}

/// Handle to a running server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    coordinator: Arc<SessionCoordinator>,
    stop: Sender<()>,
    threads: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    /// Address the server listens on.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The session the server feeds.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.coordinator
    }

    /// Stop accepting, run a final tick and join the server threads.
    ///
    /// Connected peers are not closed; their reader threads end when the
    /// peers hang up.
    pub fn shutdown(self) {
        drop(self.stop);
        join_all(self.threads);
        tracing::info!("Server on {} stopped", self.local_addr);
    }

    /// Block until the server threads exit.
    pub fn wait(self) {
        let Self { stop, threads, .. } = self;
        join_all(threads);
        drop(stop);
    }
}

fn join_all(threads: Vec<JoinHandle<()>>) {
    for handle in threads {
        if handle.join().is_err() {
            tracing::error!("Server thread panicked");
        }
    }
}

fn accept_loop(
    listener: &TcpListener,
    coordinator: &Arc<SessionCoordinator>,
    sender: &CommandSender<Inbound>,
    shutdown: &Receiver<()>,
) {
    loop {
        match shutdown.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }
        match listener.accept() {
            Ok((stream, addr)) => {
                tracing::info!("Connection from {}", addr);
                if let Err(err) = admit(stream, coordinator, sender) {
                    tracing::warn!("Refused {}: {}", addr, err);
                }
            }
            Err(ref err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL);
            }
            Err(err) => {
                tracing::warn!("Error accepting connection: {}", err);
                thread::sleep(ACCEPT_POLL * 10);
            }
        }
    }
}

/// Why a connection was turned away.
#[derive(Debug, thiserror::Error)]
enum AdmitError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Seat a connection and start its writer and reader threads.
///
/// The coordinator only ever enqueues onto the peer's unbounded outbound
/// queue; the writer thread owns the socket's write half.
fn admit(
    stream: TcpStream,
    coordinator: &SessionCoordinator,
    sender: &CommandSender<Inbound>,
) -> Result<(), AdmitError> {
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)?;
    let writer = stream.try_clone()?;

    let (queue, outbound) = crossbeam_channel::unbounded::<Command>();
    let seat = coordinator.connect(Box::new(queue))?;
    let peer = seat.peer;

    let spawned = thread::Builder::new()
        .name(format!("writer-{}", peer.0))
        .spawn(move || write_commands(writer, peer, &outbound))
        .and_then(|_| {
            let sender = sender.clone();
            thread::Builder::new()
                .name(format!("reader-{}", peer.0))
                .spawn(move || read_commands(stream, peer, &sender))
        });
    if let Err(err) = spawned {
        coordinator.disconnect(peer);
        return Err(err.into());
    }
    Ok(())
}
