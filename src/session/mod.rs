//! Sessions: peers seated around one rule engine.
//!
//! The [`SessionCoordinator`] is the only thing that touches the engine
//! once a session runs. Transports hand it an [`Outbox`] per connection and
//! push [`Inbound`] items onto a command channel; a scheduler drains that
//! channel into [`SessionCoordinator::dispatch`].

mod coordinator;
mod peer;

pub use coordinator::SessionCoordinator;
pub use peer::{Inbound, Outbox, PeerId, Seat};
