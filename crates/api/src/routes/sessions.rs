//! Route definitions for manager-side session stage transitions.

use axum::routing::post;
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Session routes, nested under `/sessions`.
///
/// ```text
/// POST   /{id}/employee-complete   employee_complete
/// POST   /{id}/manager-review      manager_review
/// POST   /{id}/complete            complete_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/employee-complete", post(sessions::employee_complete))
        .route("/{id}/manager-review", post(sessions::manager_review))
        .route("/{id}/complete", post(sessions::complete_session))
}
