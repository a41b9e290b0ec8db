//! Server configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) gives a standard 8x8 English draughts server on
//! `127.0.0.1:8080`.
//!
//! ```toml
//! bind = "0.0.0.0:8080"
//! variant = "english_draughts"
//! tick_rate = 30
//!
//! [board]
//! width = 10
//! height = 10
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::BoardSize;
use crate::error::ConfigError;
use crate::rules::Variant;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default scheduler ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Everything needed to start a server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,

    /// Board dimensions.
    pub board: BoardSize,

    /// Rule set.
    pub variant: Variant,

    /// How often per second the scheduler drains the command channel.
    pub tick_rate: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            board: BoardSize::STANDARD,
            variant: Variant::default(),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl ServerConfig {
    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML or unknown keys, or any
    /// error from [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the values that parse fine but cannot be used.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidBoard`] if the variant cannot use the board
    /// - [`ConfigError::InvalidTickRate`] if `tick_rate` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.variant.validate(self.board)?;
        if self.tick_rate == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        Ok(())
    }

    /// Interval between scheduler ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}
