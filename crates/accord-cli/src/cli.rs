//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{listen::ListenArgs, login::LoginArgs};

/// Chat gateway CLI tool for session exploration.
#[derive(Parser, Debug)]
#[command(name = "accord")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify credentials and print the issued session token
    Login(LoginArgs),

    /// Connect a session and print gateway events
    Listen(ListenArgs),
}
