//! Command-line interface definitions.
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// rendezvous - Reservation backend client
///
/// Talks to a reservation/appointment backend over HTTP, or answers locally
/// in demo mode when no backend is configured.
#[derive(Debug, Parser)]
#[command(name = "rendezvous")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "RENDEZVOUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides configuration and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Increase verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level forced by verbose/quiet flags, if any.
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }

        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the backend is healthy
    Health,

    /// Check that the backend reaches its database
    DbStatus,

    /// Create a reservation
    Create(CreateArgs),

    /// List reservations
    List,

    /// Delete a reservation
    Delete(DeleteArgs),

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Run an in-memory mock backend
    MockBackend(MockBackendArgs),
}

/// Arguments for the `create` subcommand.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Reservation payload as inline JSON
    #[arg(short, long, conflicts_with = "file")]
    pub data: Option<String>,

    /// Read the reservation payload from a file ("-" for stdin)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the `delete` subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Reservation id
    pub id: String,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration file
    Validate,

    /// Show the effective configuration
    Show,
}

/// Arguments for the `mock-backend` subcommand.
#[derive(Debug, Args)]
pub struct MockBackendArgs {
    /// Bind address
    #[arg(long)]
    pub bind: Option<String>,

    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,
}
