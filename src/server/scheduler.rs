//! Periodic drain of the command channel into the coordinator.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{select, tick, Receiver};

use crate::channel::CommandChannel;
use crate::session::{Inbound, SessionCoordinator};

/// Runs on its own thread. Each tick, everything queued so far is handed
/// to the coordinator in arrival order.
pub struct Scheduler {
    coordinator: Arc<SessionCoordinator>,
    channel: CommandChannel<Inbound>,
    interval: Duration,
    ticks: u64,
}

impl Scheduler {
    /// Create a scheduler that ticks every `interval`.
    #[must_use]
    pub fn new(coordinator: Arc<SessionCoordinator>, channel: CommandChannel<Inbound>, interval: Duration) -> Self {
        Self {
            coordinator,
            channel,
            interval,
            ticks: 0,
        }
    }

    /// Dispatch everything pending. Returns how many items were handled.
    pub fn tick(&mut self) -> usize {
        self.ticks += 1;
        let mut handled = 0;
        for inbound in self.channel.drain() {
            self.coordinator.dispatch(inbound);
            handled += 1;
        }
        handled
    }

    /// Ticks run so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Tick until `shutdown` receives a message or its sender is dropped.
    ///
    /// Whatever is queued at shutdown gets one last tick.
    pub fn run(mut self, shutdown: &Receiver<()>) {
        tracing::debug!("Scheduler running every {:?}", self.interval);
        let ticker = tick(self.interval);
        loop {
            select! {
                recv(ticker) -> _ => {
                    self.tick();
                }
                recv(shutdown) -> _ => break,
            }
        }
        self.tick();
        tracing::debug!("Scheduler stopped after {} ticks", self.ticks);
    }
}
