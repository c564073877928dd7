//! Route definitions for the application review workflow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Application routes, nested under `/applications`.
///
/// ```text
/// POST   /                       submit_application
/// GET    /                       list_applications
/// POST   /talent-pool/bulk       bulk_move_to_talent_pool
/// GET    /{id}                   get_application
/// POST   /{id}/approve           approve_application
/// POST   /{id}/reject            reject_application
/// POST   /{id}/talent-pool       move_to_talent_pool
/// POST   /{id}/reactivate        reactivate_application
/// POST   /{id}/withdraw          withdraw_application
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(applications::submit_application).get(applications::list_applications),
        )
        .route(
            "/talent-pool/bulk",
            post(applications::bulk_move_to_talent_pool),
        )
        .route("/{id}", get(applications::get_application))
        .route("/{id}/approve", post(applications::approve_application))
        .route("/{id}/reject", post(applications::reject_application))
        .route("/{id}/talent-pool", post(applications::move_to_talent_pool))
        .route(
            "/{id}/reactivate",
            post(applications::reactivate_application),
        )
        .route("/{id}/withdraw", post(applications::withdraw_application))
}
