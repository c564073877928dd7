use std::sync::Arc;

use innboard_core::lifecycle::ApplicationLifecycle;
use innboard_core::onboarding::OnboardingSessions;
use innboard_core::steps::StepRegistry;
use innboard_core::store::RecordStore;
use innboard_core::tracker::StepTracker;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The record store every manager reads and writes through.
    pub store: Arc<dyn RecordStore>,
    /// Application submission and review workflow.
    pub lifecycle: Arc<ApplicationLifecycle>,
    /// Onboarding session manager.
    pub sessions: OnboardingSessions,
    /// Step completion tracking.
    pub tracker: StepTracker,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the domain managers over a record store. The same constructor
    /// serves the production binary (Postgres store) and integration tests
    /// (in-memory store).
    pub fn new(store: Arc<dyn RecordStore>, config: Arc<ServerConfig>) -> Self {
        let sessions = OnboardingSessions::new(Arc::clone(&store), StepRegistry::standard())
            .with_default_expiry(config.session_expiry_hours);
        let lifecycle = Arc::new(ApplicationLifecycle::new(
            Arc::clone(&store),
            sessions.clone(),
        ));
        let tracker = StepTracker::new(sessions.clone());

        AppState {
            store,
            lifecycle,
            sessions,
            tracker,
            config,
        }
    }
}
