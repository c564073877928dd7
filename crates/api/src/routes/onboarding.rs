//! Route definitions for the token-gated onboarding surface.

use axum::routing::get;
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Token-scoped onboarding routes, nested under `/onboarding`.
///
/// ```text
/// GET    /{token}                 resolve_session
/// GET    /{token}/progress        get_progress
/// GET    /{token}/steps/{step}    get_step
/// POST   /{token}/steps/{step}    complete_step
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(onboarding::resolve_session))
        .route("/{token}/progress", get(onboarding::get_progress))
        .route(
            "/{token}/steps/{step}",
            get(onboarding::get_step).post(onboarding::complete_step),
        )
}
