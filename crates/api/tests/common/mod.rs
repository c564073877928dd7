//! Shared fixtures for API integration tests.
//!
//! Tests run the full router (same middleware stack as production) over
//! the in-memory record store, so no database is required.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use innboard_api::config::ServerConfig;
use innboard_api::router::build_app_router;
use innboard_api::state::AppState;
use innboard_core::memory::MemoryStore;
use innboard_core::store::{RecordStore, User};
use innboard_core::types::DbId;

pub struct TestApp {
    pub app: Router,
    pub store: MemoryStore,
    pub property_id: DbId,
    pub reviewer_id: DbId,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session_expiry_hours: 72,
    }
}

/// Build the full application router over a fresh in-memory store with
/// one reviewer scoped to one property.
pub async fn build_test_app() -> TestApp {
    let store = MemoryStore::new();
    let property_id = uuid::Uuid::new_v4();
    let reviewer_id = uuid::Uuid::new_v4();

    store
        .seed_user(User {
            id: reviewer_id,
            name: "Riley HR".into(),
            role: "manager".into(),
            property_ids: vec![property_id],
        })
        .await;

    let config = test_config();
    let shared: Arc<dyn RecordStore> = Arc::new(store.clone());
    let state = AppState::new(shared, Arc::new(config.clone()));
    let app = build_app_router(state, &config);

    TestApp {
        app,
        store,
        property_id,
        reviewer_id,
    }
}

/// Issue a request against the router and parse the JSON response body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A valid submission body for the fixture property.
pub fn submission_json(property_id: DbId, email: &str) -> serde_json::Value {
    serde_json::json!({
        "property_id": property_id,
        "department": "Front Desk",
        "position": "Agent",
        "applicant": {
            "first_name": "Ada",
            "last_name": "Li",
            "email": email,
            "phone": "+1 555 0100",
            "details": { "availability": "weekends" }
        }
    })
}

/// A valid job offer body.
pub fn offer_json() -> serde_json::Value {
    serde_json::json!({
        "hire_date": "2026-09-01",
        "pay_rate": 21.50,
        "pay_frequency": "biweekly",
        "employment_type": "full_time"
    })
}

/// Submit and approve one application, returning `(session_id, token)`
/// from the approval response.
pub async fn approved_session(fx: &TestApp) -> (String, String) {
    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/v1/applications",
        Some(submission_json(fx.property_id, "a@x.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let application_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/applications/{application_id}/approve"),
        Some(serde_json::json!({
            "reviewer_id": fx.reviewer_id,
            "offer": offer_json(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let session_id = body["data"]["session"]["session"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let token = body["data"]["session"]["token"].as_str().unwrap().to_string();
    (session_id, token)
}
