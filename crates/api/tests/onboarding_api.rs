//! Integration tests for the token-gated onboarding endpoints and the
//! manager-side session transitions.

mod common;

use axum::http::StatusCode;

use innboard_core::session::SessionPatch;
use innboard_core::store::RecordStore;

use common::{approved_session, build_test_app, send, TestApp};

/// Push a session's expiry into the past, simulating elapsed time.
async fn force_expire(fx: &TestApp, session_id: &str) {
    let id = session_id.parse().unwrap();
    fx.store
        .update_session(
            id,
            &SessionPatch {
                status: None,
                expires_at: Some(chrono::Utc::now() - chrono::Duration::hours(1)),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn resolving_token_starts_the_session() {
    let fx = build_test_app().await;
    let (_, token) = approved_session(&fx).await;

    let (status, body) = send(&fx.app, "GET", &format!("/api/v1/onboarding/{token}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["session"]["status"], "in_progress");
    assert_eq!(body["data"]["progress"]["progress_percentage"], 0);
    // The token hash never leaves the server.
    assert!(body["data"]["session"].get("token_hash").is_none());
}

#[tokio::test]
async fn unknown_token_returns_404() {
    let fx = build_test_app().await;

    let (status, body) = send(
        &fx.app,
        "GET",
        "/api/v1/onboarding/definitely-not-a-token",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn complete_step_then_read_it_back() {
    let fx = build_test_app().await;
    let (_, token) = approved_session(&fx).await;

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/onboarding/{token}/steps/welcome"),
        Some(serde_json::json!({ "form_data": { "ack": true } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["step"]["step_name"], "welcome");
    assert_eq!(body["data"]["step"]["signed"], false);
    assert!(body["data"]["progress"]["progress_percentage"].as_u64().unwrap() > 0);

    let (status, body) = send(
        &fx.app,
        "GET",
        &format!("/api/v1/onboarding/{token}/steps/welcome"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["form_data"]["ack"], true);
}

#[tokio::test]
async fn unknown_step_returns_400() {
    let fx = build_test_app().await;
    let (_, token) = approved_session(&fx).await;

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/onboarding/{token}/steps/background_check"),
        Some(serde_json::json!({ "form_data": {} })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STEP");
}

#[tokio::test]
async fn signing_without_form_data_returns_422() {
    let fx = build_test_app().await;
    let (_, token) = approved_session(&fx).await;

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/onboarding/{token}/steps/w4"),
        Some(serde_json::json!({ "signature_data": { "signature": "sig" } })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "MISSING_FORM_DATA");
}

#[tokio::test]
async fn expired_token_returns_410() {
    let fx = build_test_app().await;
    let (session_id, token) = approved_session(&fx).await;

    send(&fx.app, "GET", &format!("/api/v1/onboarding/{token}"), None).await;
    force_expire(&fx, &session_id).await;

    let (status, body) = send(&fx.app, "GET", &format!("/api/v1/onboarding/{token}"), None).await;

    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["code"], "SESSION_EXPIRED");
}

#[tokio::test]
async fn full_session_progression_over_http() {
    let fx = build_test_app().await;
    let (session_id, token) = approved_session(&fx).await;

    send(&fx.app, "GET", &format!("/api/v1/onboarding/{token}"), None).await;

    // Complete every required employee-side step, signed.
    for step in [
        "welcome",
        "personal_info",
        "i9_section1",
        "w4",
        "direct_deposit",
        "company_policies",
    ] {
        let (status, _) = send(
            &fx.app,
            "POST",
            &format!("/api/v1/onboarding/{token}/steps/{step}"),
            Some(serde_json::json!({
                "form_data": { "ok": true },
                "signature_data": { "signature": "sig" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "step {step} should save");
    }

    let (_, body) = send(
        &fx.app,
        "GET",
        &format!("/api/v1/onboarding/{token}/progress"),
        None,
    )
    .await;
    assert_eq!(body["data"]["progress_percentage"], 100);

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/sessions/{session_id}/employee-complete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "employee_completed");

    let (status, _) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/sessions/{session_id}/manager-review"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Completion is gated on the manager-side I-9 section 2.
    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/sessions/{session_id}/complete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("i9_section2"));

    send(
        &fx.app,
        "POST",
        &format!("/api/v1/onboarding/{token}/steps/i9_section2"),
        Some(serde_json::json!({
            "form_data": { "document_title": "Passport" },
            "signature_data": { "signature": "mgr" }
        })),
    )
    .await;

    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/sessions/{session_id}/complete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");

    // A completed session refuses further step writes.
    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/onboarding/{token}/steps/welcome"),
        Some(serde_json::json!({ "form_data": { "ack": true } })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn skipping_stages_returns_409() {
    let fx = build_test_app().await;
    let (session_id, _) = approved_session(&fx).await;

    // Still not_started: employee-complete is illegal.
    let (status, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/sessions/{session_id}/employee-complete"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
    assert!(body["error"].as_str().unwrap().contains("'not_started'"));
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let fx = build_test_app().await;

    let (status, body) = send(&fx.app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
