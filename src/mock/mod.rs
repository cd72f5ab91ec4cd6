//! Mock backend - an in-memory reservation server.
//!
//! Implements the default endpoint table so the client can be exercised
//! without a real backend.

pub mod handlers;
pub mod state;

#[cfg(test)]
mod handlers_tests;

use crate::config::MockConfig;
use crate::error::{Error, Result};
use axum::{
    routing::{delete, get, post},
    Router,
};
use state::MockState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Creates the mock backend router.
pub fn create_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/db-status", get(handlers::db_status))
        .route(
            "/api/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route("/api/appointments/:id", delete(handlers::delete_appointment))
        .route("/api/reservations", post(handlers::create_reservation))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address.
pub async fn bind(config: &MockConfig) -> Result<TcpListener> {
    let addr = SocketAddr::new(
        config
            .bind
            .parse()
            .map_err(|e| Error::config_with_source(format!("Invalid bind address: {}", config.bind), e))?,
        config.port,
    );

    TcpListener::bind(addr).await.map_err(Error::from)
}

/// Serves the mock backend on an already bound listener.
pub async fn serve_on(listener: TcpListener) -> Result<()> {
    let router = create_router(Arc::new(MockState::new()));

    if let Ok(addr) = listener.local_addr() {
        info!("Mock backend listening on http://{}", addr);
    }

    axum::serve(listener, router).await?;
    Ok(())
}

/// Starts the mock backend.
pub async fn serve(config: &MockConfig) -> Result<()> {
    let listener = bind(config).await?;
    serve_on(listener).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiClient, NoopObserver};
    use crate::config::{ApiConfig, EndpointsConfig, TimeoutConfig};
    use serde_json::json;

    async fn spawn() -> String {
        let listener = bind(&MockConfig {
            bind: "127.0.0.1".to_string(),
            port: 0,
        })
        .await
        .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_on(listener));
        format!("http://{}", addr)
    }

    fn client(api: ApiConfig) -> ApiClient {
        ApiClient::new(&api, &TimeoutConfig::default())
            .unwrap()
            .with_observer(Arc::new(NoopObserver))
    }

    #[test]
    fn test_create_router() {
        let _router = create_router(Arc::new(MockState::new()));
    }

    #[tokio::test]
    async fn test_bind_rejects_invalid_address() {
        let result = bind(&MockConfig {
            bind: "not-an-ip".to_string(),
            port: 5000,
        })
        .await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_client_against_mock_backend() {
        let base = spawn().await;
        let client = client(ApiConfig {
            base_url: Some(base),
            ..Default::default()
        });

        assert!(client.check_health().await);
        assert!(client.check_database_status().await);

        let created = client
            .create_reservation(&json!({"name": "Ada", "date": "2026-11-02", "time": "10:00"}))
            .await
            .unwrap();
        let id = created["_id"].as_str().unwrap().to_string();
        assert_eq!(created["name"], "Ada");

        let listed = client.list_reservations().await.unwrap();
        assert_eq!(listed, json!([created]));

        let confirmation = client.delete_reservation(&id).await.unwrap();
        assert_eq!(confirmation, json!({"message": "Appointment deleted", "id": id}));

        let err = client.delete_reservation(&id).await.unwrap_err();
        assert_eq!(err.to_string(), "API 404: Appointment not found");

        let err = client.create_reservation(&json!(["not", "an", "object"])).await.unwrap_err();
        assert_eq!(err.to_string(), "API 400: Payload must be a JSON object");
    }

    #[tokio::test]
    async fn test_credentialed_variant_against_mock_backend() {
        let base = spawn().await;
        let mut api = ApiConfig {
            base_url: Some(base),
            endpoints: EndpointsConfig::reservations(),
            ..Default::default()
        };
        api.credential = Some("mongodb://localhost/rendezvous".to_string());

        let created = client(api)
            .create_reservation(&json!({"name": "Grace"}))
            .await
            .unwrap();
        assert_eq!(created["name"], "Grace");
    }
}
