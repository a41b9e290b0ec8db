//! Commands: a name plus ordered text parameters.
//!
//! On the wire a command is its name followed by its parameters, separated
//! by single spaces. Framing (how the transport delimits one command from
//! the next) is left to the transport.
//!
//! ## Example
//!
//! ```
//! use rust_draughts::core::{PieceId, Position};
//! use rust_draughts::protocol::Command;
//!
//! let command = Command::build("move")
//!     .param(PieceId(9))
//!     .param(Position::new(3, 4))
//!     .finish();
//!
//! assert_eq!(command.encode(), "move 9 3 4");
//! assert_eq!(Command::decode("move 9 3 4").unwrap(), command);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Color, Kind, PieceId, Position};
use crate::error::ProtocolError;

/// Token written for an absent optional id.
pub const NONE_TOKEN: &str = "none";

/// Parameter list. Six tokens cover every fixed-size command inline.
pub type Params = SmallVec<[String; 6]>;

/// A decoded command.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    name: String,
    params: Params,
}

impl Command {
    /// Create a command with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Params::new(),
        }
    }

    /// Start building a command.
    #[must_use]
    pub fn build(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            command: Self::new(name),
        }
    }

    /// Command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All parameters, in order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// One parameter by index.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Append a typed parameter.
    pub fn push(&mut self, value: impl Parameter) {
        value.write_to(&mut self.params);
    }

    /// Text form: name and parameters joined by spaces.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = self.name.clone();
        for param in &self.params {
            out.push(' ');
            out.push_str(param);
        }
        out
    }

    /// Parse the text form. Any run of whitespace separates tokens.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Empty`] if the text holds no tokens.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let mut tokens = text.split_whitespace();
        let name = tokens.next().ok_or(ProtocolError::Empty)?;
        Ok(Self {
            name: name.to_string(),
            params: tokens.map(str::to_string).collect(),
        })
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl std::str::FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Fluent construction of a [`Command`].
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    /// Append a typed parameter.
    #[must_use]
    pub fn param(mut self, value: impl Parameter) -> Self {
        self.command.push(value);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn finish(self) -> Command {
        self.command
    }
}

/// A value that serializes to one or more command tokens.
pub trait Parameter {
    /// Append this value's tokens.
    fn write_to(&self, params: &mut Params);
}

impl<T: Parameter + ?Sized> Parameter for &T {
    fn write_to(&self, params: &mut Params) {
        (**self).write_to(params);
    }
}

impl Parameter for str {
    fn write_to(&self, params: &mut Params) {
        params.push(self.to_string());
    }
}

impl Parameter for u32 {
    fn write_to(&self, params: &mut Params) {
        params.push(self.to_string());
    }
}

impl Parameter for bool {
    fn write_to(&self, params: &mut Params) {
        params.push(self.to_string());
    }
}

impl Parameter for PieceId {
    fn write_to(&self, params: &mut Params) {
        params.push(self.raw().to_string());
    }
}

impl Parameter for Option<PieceId> {
    fn write_to(&self, params: &mut Params) {
        match self {
            Some(id) => id.write_to(params),
            None => params.push(NONE_TOKEN.to_string()),
        }
    }
}

impl Parameter for Color {
    fn write_to(&self, params: &mut Params) {
        params.push(self.as_str().to_string());
    }
}

impl Parameter for Kind {
    fn write_to(&self, params: &mut Params) {
        params.push(self.as_str().to_string());
    }
}

/// Positions take two tokens: `x y`.
impl Parameter for Position {
    fn write_to(&self, params: &mut Params) {
        params.push(self.x.to_string());
        params.push(self.y.to_string());
    }
}
