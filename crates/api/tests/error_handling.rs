//! Tests for `AppError` -> HTTP response mapping.
//!
//! Each domain error variant must produce the correct HTTP status code,
//! error code, and message. These call `IntoResponse` directly on
//! `AppError` values; no HTTP server is involved.

use axum::response::IntoResponse;
use http_body_util::BodyExt;

use innboard_api::error::AppError;
use innboard_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "application",
        id: "42".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "application not found: 42");
}

#[tokio::test]
async fn invalid_transition_returns_409_with_current_status() {
    let id = uuid::Uuid::new_v4();
    let err = AppError::Core(CoreError::InvalidTransition {
        entity: "application",
        id,
        action: "approve",
        current: "rejected".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert!(json["error"].as_str().unwrap().contains("'rejected'"));
}

#[tokio::test]
async fn duplicate_pending_returns_409() {
    let (status, json) = error_to_response(AppError::Core(CoreError::DuplicatePending)).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_APPLICATION");
}

#[tokio::test]
async fn forbidden_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("unknown reviewer".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "unknown reviewer");
}

#[tokio::test]
async fn expired_returns_410() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Expired)).await;

    assert_eq!(status, axum::http::StatusCode::GONE);
    assert_eq!(json["code"], "SESSION_EXPIRED");
}

#[tokio::test]
async fn invalid_step_returns_400() {
    let err = AppError::Core(CoreError::InvalidStep("background_check".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_STEP");
    assert!(json["error"].as_str().unwrap().contains("background_check"));
}

#[tokio::test]
async fn missing_form_data_returns_422() {
    let err = AppError::Core(CoreError::MissingFormData("w4".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "MISSING_FORM_DATA");
}

#[tokio::test]
async fn validation_returns_400() {
    let err = AppError::Core(CoreError::Validation("pay rate must be positive".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "pay rate must be positive");
}

#[tokio::test]
async fn store_error_returns_500_and_sanitizes_message() {
    let err = AppError::Core(CoreError::Store("connection string with password".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    // The response body must NOT contain the original error details.
    assert!(
        !json.to_string().contains("password"),
        "Internal error response must not leak storage details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}
