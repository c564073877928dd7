//! Handlers for the token-gated onboarding surface.
//!
//! The session token in the path is the sole credential. Unknown tokens
//! read as 404, expired sessions as 410, and writes to a finished session
//! as 409.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use innboard_core::session::OnboardingSession;
use innboard_core::tracker::ProgressSummary;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct CompleteStepBody {
    #[serde(default)]
    pub form_data: Option<serde_json::Value>,
    #[serde(default)]
    pub signature_data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedSession {
    pub session: OnboardingSession,
    pub progress: ProgressSummary,
}

/// GET /api/v1/onboarding/{token}
///
/// Resolve the session behind a token. The first successful resolution
/// moves the session from `not_started` to `in_progress`.
pub async fn resolve_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.resolve_by_token(&token).await?;
    let progress = state.tracker.progress(&token).await?;
    Ok(Json(DataResponse {
        data: ResolvedSession { session, progress },
    }))
}

/// GET /api/v1/onboarding/{token}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let progress = state.tracker.progress(&token).await?;
    Ok(Json(DataResponse { data: progress }))
}

/// GET /api/v1/onboarding/{token}/steps/{step}
///
/// Fetch a previously saved step. 404 if it was never submitted.
pub async fn get_step(
    State(state): State<AppState>,
    Path((token, step)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let record = state.tracker.get_step(&token, &step).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/onboarding/{token}/steps/{step}
///
/// Record (or overwrite) a step submission. Re-submission is allowed
/// while the session is live; the response carries updated progress.
pub async fn complete_step(
    State(state): State<AppState>,
    Path((token, step)): Path<(String, String)>,
    Json(body): Json<CompleteStepBody>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .tracker
        .complete_step(&token, &step, body.form_data, body.signature_data)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}
