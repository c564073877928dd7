//! Handlers for manager-side session stage transitions.
//!
//! These operate on the session id rather than the token; they belong to
//! the manager-facing surface, not the employee link.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use innboard_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/sessions/{id}/employee-complete
///
/// `in_progress -> employee_completed`. Outstanding required steps do not
/// block this; they are logged for follow-up.
pub async fn employee_complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.mark_employee_complete(id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/manager-review
///
/// `employee_completed -> manager_review`.
pub async fn manager_review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.mark_manager_reviewed(id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/complete
///
/// `manager_review -> completed`, allowed only once every required
/// manager-side step has been recorded.
pub async fn complete_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.complete(id).await?;
    Ok(Json(DataResponse { data: session }))
}
