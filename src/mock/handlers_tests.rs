//! Tests for mock backend handlers.

#[cfg(test)]
mod tests {
    use crate::mock::create_router;
    use crate::mock::state::MockState;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
        response::Response,
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        create_router(Arc::new(MockState::new()))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_router();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_db_status_endpoint() {
        let app = create_test_router();

        let request = Request::builder()
            .uri("/api/db-status")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, json!({"status": "connected", "appointments": 0}));
    }

    #[tokio::test]
    async fn test_create_appointment_endpoint() {
        let app = create_test_router();

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/appointments",
                json!({"name": "Ada"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["name"], "Ada");
        assert!(body["_id"].is_string());
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_create_appointment_rejects_malformed_json() {
        let app = create_test_router();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/appointments")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_reservation_requires_credential_header() {
        let app = create_test_router();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/reservations",
                json!({"name": "Ada"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Missing X-Mongo-URI header");

        let mut request = json_request(Method::POST, "/api/reservations", json!({"name": "Ada"}));
        request
            .headers_mut()
            .insert("x-mongo-uri", "mongodb://localhost".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_delete_unknown_appointment() {
        let app = create_test_router();

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/appointments/unknown")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Appointment not found");
    }

    #[tokio::test]
    async fn test_create_list_delete_flow() {
        let app = create_test_router();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/appointments",
                json!({"name": "Ada"}),
            ))
            .await
            .unwrap();
        let created: Value = serde_json::from_str(&body_text(response).await).unwrap();
        let id = created["_id"].as_str().unwrap();

        let request = Request::builder()
            .uri("/api/appointments")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let listed: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(listed, json!([created.clone()]));

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/appointments/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["message"], "Appointment deleted");
        assert_eq!(body["id"], id);
    }
}
