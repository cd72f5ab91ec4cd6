//! Error types and error handling for rendezvous.
//!
//! This module defines the crate-wide error type, the `Result` alias and the
//! CLI exit codes. Backend failures are normalized into [`Error::Api`], whose
//! display form is exactly `API {status}: {body}`.

use thiserror::Error;

/// CLI exit codes.
pub mod exit_code {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 2;
    /// Connection error, or a failed health/status check
    pub const CONNECTION_ERROR: i32 = 3;
    /// Timeout error
    pub const TIMEOUT_ERROR: i32 = 4;
    /// The backend answered with a non-2xx status
    pub const API_ERROR: i32 = 5;
    /// Command line argument error
    pub const CLI_ERROR: i32 = 64;
}

/// The main error type for rendezvous.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is invalid, or required configuration is missing.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-2xx status.
    ///
    /// `body` is the raw response text; it is never parsed as JSON.
    #[error("API {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never produced a response.
    #[error("Connection error: {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {target} (waited {seconds}s)")]
    Timeout { target: String, seconds: u64 },

    /// A 2xx response body was not valid JSON.
    #[error("Failed to decode response from {target}: {message}")]
    Decode { target: String, message: String },

    /// The request was rejected before it was sent.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config { .. } | Error::Yaml(_) => exit_code::CONFIG_ERROR,
            Error::Connection { .. } => exit_code::CONNECTION_ERROR,
            Error::Timeout { .. } => exit_code::TIMEOUT_ERROR,
            Error::Api { .. } => exit_code::API_ERROR,
            Error::InvalidRequest { .. } | Error::Json(_) => exit_code::CLI_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Returns the HTTP status when the backend answered with an error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Creates a configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error with a message and source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest {
            message: message.into(),
        }
    }

    /// Classifies a transport error raised while talking to `target`.
    pub(crate) fn from_transport(target: &str, timeout_secs: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Error::Timeout {
                target: target.to_string(),
                seconds: timeout_secs,
            }
        } else {
            Error::Connection {
                target: target.to_string(),
                source,
            }
        }
    }
}

/// Result type alias for rendezvous operations.
pub type Result<T> = std::result::Result<T, Error>;
