//! Reservation API trait.
//!
//! This module defines the `ReservationApi` trait that callers program
//! against. [`ApiClient`] is the HTTP implementation.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;

/// Operations offered by a reservation backend.
///
/// Checks are soft: they report failure as `false`. Every other operation
/// returns the backend's JSON answer unmodified, or an error.
#[async_trait]
pub trait ReservationApi: Send + Sync {
    /// Returns true when the backend is healthy.
    async fn check_health(&self) -> bool;

    /// Returns true when the backend reaches its database.
    async fn check_database_status(&self) -> bool;

    /// Creates a reservation from an opaque JSON payload.
    async fn create_reservation(&self, payload: &Value) -> Result<Value>;

    /// Lists reservations.
    async fn list_reservations(&self) -> Result<Value>;

    /// Deletes the reservation with the given id.
    async fn delete_reservation(&self, id: &str) -> Result<Value>;
}

#[async_trait]
impl ReservationApi for ApiClient {
    async fn check_health(&self) -> bool {
        ApiClient::check_health(self).await
    }

    async fn check_database_status(&self) -> bool {
        ApiClient::check_database_status(self).await
    }

    async fn create_reservation(&self, payload: &Value) -> Result<Value> {
        ApiClient::create_reservation(self, payload).await
    }

    async fn list_reservations(&self) -> Result<Value> {
        ApiClient::list_reservations(self).await
    }

    async fn delete_reservation(&self, id: &str) -> Result<Value> {
        ApiClient::delete_reservation(self, id).await
    }
}
