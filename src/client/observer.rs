//! Request observation hooks.
//!
//! The client reports every exchange through a [`RequestObserver`]. The
//! default [`TracingObserver`] turns those reports into `tracing` events;
//! [`NoopObserver`] silences them. Nothing an observer does affects the
//! result of an operation.

use reqwest::{Method, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::Error;

/// Logical client operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Backend health check.
    Health,
    /// Database status check.
    DbStatus,
    /// Create a reservation.
    Create,
    /// List reservations.
    List,
    /// Delete a reservation.
    Delete,
}

impl Operation {
    /// Returns the operation name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Health => "health",
            Operation::DbStatus => "db_status",
            Operation::Create => "create_reservation",
            Operation::List => "list_reservations",
            Operation::Delete => "delete_reservation",
        }
    }

    /// Returns true for operations that report failure as `false`.
    pub fn is_check(&self) -> bool {
        matches!(self, Operation::Health | Operation::DbStatus)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request about to be sent.
#[derive(Debug)]
pub struct RequestEvent<'a> {
    pub operation: Operation,
    pub method: &'a Method,
    pub url: &'a str,
    /// Encoded JSON body, if any.
    pub body: Option<&'a [u8]>,
}

/// A response whose status line has been received.
#[derive(Debug)]
pub struct ResponseEvent<'a> {
    pub operation: Operation,
    pub url: &'a str,
    pub status: StatusCode,
    pub elapsed: Duration,
}

/// An operation that failed.
#[derive(Debug)]
pub struct ErrorEvent<'a> {
    pub operation: Operation,
    /// `None` when the failure happened before a URL was built.
    pub url: Option<&'a str>,
    pub error: &'a Error,
}

/// Hooks invoked by the client around every exchange.
///
/// All methods default to doing nothing.
pub trait RequestObserver: Send + Sync {
    /// Called before a request is sent.
    fn on_request(&self, _event: &RequestEvent<'_>) {}

    /// Called when a response arrives, whatever its status.
    fn on_response(&self, _event: &ResponseEvent<'_>) {}

    /// Called when an operation fails, including soft failures.
    fn on_error(&self, _event: &ErrorEvent<'_>) {}

    /// Called when an operation is answered locally in demo mode.
    fn on_demo(&self, _operation: Operation) {}
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, event: &RequestEvent<'_>) {
        match event.body {
            Some(body) => debug!(
                operation = %event.operation,
                method = %event.method,
                url = %event.url,
                payload = %String::from_utf8_lossy(body),
                "Sending request"
            ),
            None => debug!(
                operation = %event.operation,
                method = %event.method,
                url = %event.url,
                "Sending request"
            ),
        }
    }

    fn on_response(&self, event: &ResponseEvent<'_>) {
        if event.status.is_success() {
            info!(
                operation = %event.operation,
                url = %event.url,
                status = event.status.as_u16(),
                elapsed_ms = event.elapsed.as_millis() as u64,
                "Response received"
            );
        } else {
            debug!(
                operation = %event.operation,
                url = %event.url,
                status = event.status.as_u16(),
                elapsed_ms = event.elapsed.as_millis() as u64,
                "Error response received"
            );
        }
    }

    fn on_error(&self, event: &ErrorEvent<'_>) {
        let url = event.url.unwrap_or("-");
        if event.operation.is_check() {
            warn!(operation = %event.operation, url = %url, error = %event.error, "Check failed");
        } else {
            error!(operation = %event.operation, url = %url, error = %event.error, "Request failed");
        }
    }

    fn on_demo(&self, operation: Operation) {
        warn!(operation = %operation, "No backend URL configured, answering in demo mode");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::Health.to_string(), "health");
        assert_eq!(Operation::DbStatus.to_string(), "db_status");
        assert_eq!(Operation::Create.to_string(), "create_reservation");
        assert_eq!(Operation::List.to_string(), "list_reservations");
        assert_eq!(Operation::Delete.to_string(), "delete_reservation");
    }

    #[test]
    fn test_is_check() {
        assert!(Operation::Health.is_check());
        assert!(Operation::DbStatus.is_check());
        assert!(!Operation::Create.is_check());
        assert!(!Operation::Delete.is_check());
    }

    #[test]
    fn test_tracing_observer_accepts_every_event() {
        let observer = TracingObserver;
        let error = Error::Api {
            status: 500,
            body: "boom".to_string(),
        };

        observer.on_request(&RequestEvent {
            operation: Operation::Create,
            method: &Method::POST,
            url: "http://localhost/api/appointments",
            body: Some(br#"{"name":"Ada"}"#),
        });
        observer.on_response(&ResponseEvent {
            operation: Operation::Create,
            url: "http://localhost/api/appointments",
            status: StatusCode::INTERNAL_SERVER_ERROR,
            elapsed: Duration::from_millis(12),
        });
        observer.on_error(&ErrorEvent {
            operation: Operation::Create,
            url: None,
            error: &error,
        });
        observer.on_demo(Operation::Create);
    }
}
