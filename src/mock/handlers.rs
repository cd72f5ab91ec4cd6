//! HTTP request handlers for the mock backend.
//!
//! Errors are answered as plain text, the way the real backend does.

use crate::config::DEFAULT_CREDENTIAL_HEADER;
use crate::mock::state::MockState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Health check handler.
///
/// GET /health
pub async fn health(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Database status handler.
///
/// GET /api/db-status
pub async fn db_status(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    Json(json!({
        "status": "connected",
        "appointments": state.count().await,
    }))
}

/// List appointments handler.
///
/// GET /api/appointments
pub async fn list_appointments(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    Json(state.list().await)
}

/// Create appointment handler.
///
/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<Arc<MockState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    create(&state, payload).await
}

/// Create reservation handler; requires the credential header.
///
/// POST /api/reservations
pub async fn create_reservation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let has_credential = headers
        .get(DEFAULT_CREDENTIAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| !value.trim().is_empty());

    if !has_credential {
        return (
            StatusCode::UNAUTHORIZED,
            format!("Missing {} header", DEFAULT_CREDENTIAL_HEADER),
        )
            .into_response();
    }

    create(&state, payload).await
}

/// Delete appointment handler.
///
/// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> Response {
    match state.remove(&id).await {
        Some(_) => {
            info!(id = %id, "Appointment deleted");
            Json(json!({
                "message": "Appointment deleted",
                "id": id,
            }))
            .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Appointment not found").into_response(),
    }
}

async fn create(state: &MockState, payload: Result<Json<Value>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response(),
    };

    let Value::Object(fields) = payload else {
        return (StatusCode::BAD_REQUEST, "Payload must be a JSON object").into_response();
    };

    let record = state.insert(fields).await;
    info!(id = %record["_id"], "Appointment created");
    (StatusCode::CREATED, Json(record)).into_response()
}
