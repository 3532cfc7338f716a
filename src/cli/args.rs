//! Command-line argument definitions.

use clap::{Parser, Subcommand};

use crate::constants;

/// Tundeck - Terminal WireGuard tunnel switchboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// UI tick rate in milliseconds
    #[arg(long, env = "TUNDECK_TICK_RATE", default_value_t = constants::DEFAULT_TICK_RATE)]
    pub tick_rate: u64,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the configured server profiles and exit
    Profiles,
}
