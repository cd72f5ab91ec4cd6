//! HTTP client module for rendezvous.
//!
//! This module provides the client for reservation backends, the
//! [`ReservationApi`] seam over it, and the observer hooks used for logging.

pub mod api;
pub mod observer;
pub mod reservations;
mod response;


pub use api::{ApiClient, DEMO_MESSAGE};
pub use observer::{NoopObserver, Operation, RequestObserver, TracingObserver};
pub use reservations::ReservationApi;
