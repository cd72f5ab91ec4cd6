//! rendezvous - Reservation backend client
//!
//! This crate provides a thin HTTP client for reservation/appointment
//! backends. It builds URLs from a configurable endpoint table, attaches the
//! default JSON headers and an optional credential header, and normalizes
//! every non-2xx answer into `API {status}: {body}`.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`client`] - HTTP client, `ReservationApi` trait and observer hooks
//! - [`config`] - Configuration file parsing and validation
//! - [`error`] - Error types and exit codes
//! - [`mock`] - In-memory mock backend

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;

// Re-exports for convenience
pub use cli::Cli;
pub use client::{ApiClient, ReservationApi};
pub use config::Config;
pub use error::{Error, Result};
