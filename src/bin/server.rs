//! Draughts server.
//!
//! Serves one game over TCP, one command per line. Logging is controlled
//! with `RUST_LOG` (default `info`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::prelude::*;

use rust_draughts::config::ServerConfig;
use rust_draughts::error::ServerError;
use rust_draughts::server::Server;

#[derive(Parser, Debug)]
#[command(name = "draughts-server")]
#[command(about = "Serve a game of draughts over TCP", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Scheduler ticks per second, overriding the configuration
    #[arg(short, long)]
    tick_rate: Option<u32>,
}

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(tick_rate) = cli.tick_rate {
        config.tick_rate = tick_rate;
    }

    Server::bind(config)?.run();
    Ok(())
}
