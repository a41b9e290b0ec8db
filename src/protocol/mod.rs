//! Wire protocol: commands and their typed meanings.
//!
//! - [`Command`]: name plus text parameters, the unit every transport moves
//! - [`Request`]: what peers may ask the server
//! - [`Reply`]: what the server tells peers
//!
//! Only the vocabulary lives here. How a transport frames commands on the
//! byte stream is its own business; the TCP server uses one command per
//! line.

mod command;
mod messages;

pub use command::{Command, CommandBuilder, Parameter, Params, NONE_TOKEN};
pub use messages::{names, Reply, Request};
