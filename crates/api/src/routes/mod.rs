pub mod applications;
pub mod health;
pub mod onboarding;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /applications                           submit (POST), list (GET)
/// /applications/talent-pool/bulk          bulk move (POST)
/// /applications/{id}                      get
/// /applications/{id}/approve              approve (POST)
/// /applications/{id}/reject               reject (POST)
/// /applications/{id}/talent-pool          move to talent pool (POST)
/// /applications/{id}/reactivate           reactivate (POST)
/// /applications/{id}/withdraw             withdraw (POST)
///
/// /onboarding/{token}                     resolve session (GET)
/// /onboarding/{token}/progress            progress summary (GET)
/// /onboarding/{token}/steps/{step}        get (GET), complete (POST)
///
/// /sessions/{id}/employee-complete        employee side done (POST)
/// /sessions/{id}/manager-review           manager picks up (POST)
/// /sessions/{id}/complete                 finish session (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/applications", applications::router())
        .nest("/onboarding", onboarding::router())
        .nest("/sessions", sessions::router())
}
