//! Command-line interface for tiktag.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tiktag_rules::OccupiedPolicy;

/// Tik-Tag - two-player tic-tac-toe, hot-seat or over TCP
#[derive(Parser, Debug)]
#[command(name = "tiktag")]
#[command(about = "Two-player tic-tac-toe on a shared match", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML settings file
    #[arg(short, long, global = true, default_value = "tiktag.toml")]
    pub config: PathBuf,

    /// What a move on an occupied cell does
    #[arg(long, global = true)]
    pub occupied: Option<OccupiedArg>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play on this terminal, both players sharing the keyboard
    Local,

    /// Host the match for two remote players over TCP
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
}

/// Occupied-cell policy as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OccupiedArg {
    /// Flip the cell to the other mark
    Toggle,
    /// Refuse the move
    Reject,
}

impl From<OccupiedArg> for OccupiedPolicy {
    fn from(arg: OccupiedArg) -> Self {
        match arg {
            OccupiedArg::Toggle => OccupiedPolicy::Toggle,
            OccupiedArg::Reject => OccupiedPolicy::Reject,
        }
    }
}
