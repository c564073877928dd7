//! Handlers for application submission and review.
//!
//! There is no session-based authentication on this surface; the acting
//! reviewer is identified explicitly in each request body, and authority
//! over the application's property is checked in the lifecycle manager.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use innboard_core::application::{
    ApplicationFilter, JobOffer, RejectApplication, SubmitApplication,
};
use innboard_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
pub struct ApproveBody {
    pub reviewer_id: DbId,
    pub offer: JobOffer,
}

#[derive(Debug, serde::Deserialize)]
pub struct RejectBody {
    pub reviewer_id: DbId,
    pub reason: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ReviewerBody {
    pub reviewer_id: DbId,
}

#[derive(Debug, serde::Deserialize)]
pub struct BulkTalentPoolBody {
    pub reviewer_id: DbId,
    pub application_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Submission and queries
// ---------------------------------------------------------------------------

/// POST /api/v1/applications
///
/// Submit a new application. Returns 409 when a pending application with
/// the same (email, property, position) fingerprint already exists.
pub async fn submit_application(
    State(state): State<AppState>,
    Json(body): Json<SubmitApplication>,
) -> AppResult<impl IntoResponse> {
    let application = state.lifecycle.submit(body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications
///
/// List applications in submission order, optionally filtered by
/// property, position, and status.
pub async fn list_applications(
    State(state): State<AppState>,
    Query(filter): Query<ApplicationFilter>,
) -> AppResult<impl IntoResponse> {
    let applications = state.lifecycle.list(&filter).await?;
    Ok(Json(DataResponse { data: applications }))
}

/// GET /api/v1/applications/{id}
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = state.lifecycle.get(id).await?;
    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// Review decisions
// ---------------------------------------------------------------------------

/// POST /api/v1/applications/{id}/approve
///
/// Approve a pending application. Creates the employee record and a
/// token-gated onboarding session, then moves competing pending
/// applications for the same property and position to the talent pool.
/// The response carries the session token; it is not retrievable later.
pub async fn approve_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ApproveBody>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.lifecycle.approve(id, body.reviewer_id, body.offer).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/applications/{id}/reject
pub async fn reject_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<RejectBody>,
) -> AppResult<impl IntoResponse> {
    let input = RejectApplication {
        reason: body.reason,
        feedback: body.feedback,
    };
    let application = state.lifecycle.reject(id, body.reviewer_id, input).await?;
    Ok(Json(DataResponse { data: application }))
}

/// POST /api/v1/applications/{id}/talent-pool
pub async fn move_to_talent_pool(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReviewerBody>,
) -> AppResult<impl IntoResponse> {
    let application = state
        .lifecycle
        .move_to_talent_pool(id, body.reviewer_id)
        .await?;
    Ok(Json(DataResponse { data: application }))
}

/// POST /api/v1/applications/talent-pool/bulk
///
/// Move several applications to the talent pool. Each id succeeds or
/// fails independently; the response reports every outcome.
pub async fn bulk_move_to_talent_pool(
    State(state): State<AppState>,
    Json(body): Json<BulkTalentPoolBody>,
) -> AppResult<impl IntoResponse> {
    let outcomes = state
        .lifecycle
        .bulk_move_to_talent_pool(&body.application_ids, body.reviewer_id)
        .await;
    Ok(Json(DataResponse { data: outcomes }))
}

/// POST /api/v1/applications/{id}/reactivate
pub async fn reactivate_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReviewerBody>,
) -> AppResult<impl IntoResponse> {
    let application = state.lifecycle.reactivate(id, body.reviewer_id).await?;
    Ok(Json(DataResponse { data: application }))
}

/// POST /api/v1/applications/{id}/withdraw
///
/// Applicant-initiated withdrawal; takes no body and no reviewer.
pub async fn withdraw_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = state.lifecycle.withdraw(id).await?;
    Ok(Json(DataResponse { data: application }))
}
