//! Step completion tracking within an onboarding session.
//!
//! All access goes through the session token, so the same rules apply as
//! for token resolution: unknown tokens are `NotFound`, expired sessions
//! are `Expired`, and writes to a completed session are rejected. Step
//! data is read straight from the store on every call; a step completed
//! in one browser session is visible to any later session using the same
//! token.

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::onboarding::OnboardingSessions;
use crate::session::{OnboardingSession, SessionStatus};
use crate::steps::{StepRecord, StepRegistry};
use crate::store::RecordStore;

/// Result of completing a step: the stored record plus fresh progress.
#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub step: StepRecord,
    pub progress: ProgressSummary,
}

/// Aggregate progress for a session.
#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    /// Floor-rounded percentage of required employee-side steps done.
    pub progress_percentage: u8,
    pub completed_steps: Vec<String>,
    pub total_required: usize,
    pub session_status: SessionStatus,
}

#[derive(Clone)]
pub struct StepTracker {
    store: Arc<dyn RecordStore>,
    sessions: OnboardingSessions,
}

impl StepTracker {
    pub fn new(sessions: OnboardingSessions) -> Self {
        StepTracker {
            store: Arc::clone(sessions.store()),
            sessions,
        }
    }

    fn registry(&self) -> &StepRegistry {
        self.sessions.registry()
    }

    // -- Writes -------------------------------------------------------------

    /// Record (or overwrite) a step submission and return fresh progress.
    ///
    /// Steps are idempotently re-submittable while the session is live;
    /// `signed` reflects whether *this* submission carried signature data.
    /// Signing without form data (neither in this call nor previously
    /// saved) fails with [`CoreError::MissingFormData`].
    pub async fn complete_step(
        &self,
        token: &str,
        step_name: &str,
        form_data: Option<serde_json::Value>,
        signature_data: Option<serde_json::Value>,
    ) -> Result<StepOutcome, CoreError> {
        let session = self.writable_session(token).await?;
        self.registry().validate_step(step_name)?;

        let existing = self.store.get_step(session.id, step_name).await?;

        let signing = signature_data.is_some();
        let form_data = match form_data.filter(|v| !v.is_null()) {
            Some(data) => data,
            None => match existing {
                Some(prior) => prior.form_data,
                None if signing => {
                    return Err(CoreError::MissingFormData(step_name.to_string()));
                }
                None => {
                    return Err(CoreError::Validation(format!(
                        "form data is required for step '{step_name}'"
                    )));
                }
            },
        };

        let record = StepRecord {
            session_id: session.id,
            step_name: step_name.to_string(),
            form_data,
            signed: signing,
            completed_at: chrono::Utc::now(),
        };
        let stored = self.store.upsert_step(&record).await?;

        let progress = self.summarize(&session).await?;

        tracing::info!(
            session_id = %session.id,
            step = step_name,
            signed = signing,
            progress = progress.progress_percentage,
            "Onboarding step completed"
        );

        Ok(StepOutcome {
            step: stored,
            progress,
        })
    }

    // -- Reads --------------------------------------------------------------

    /// Fetch a previously saved step, or `NotFound` if never submitted.
    pub async fn get_step(&self, token: &str, step_name: &str) -> Result<StepRecord, CoreError> {
        let session = self.sessions.resolve_by_token(token).await?;
        self.registry().validate_step(step_name)?;

        self.store
            .get_step(session.id, step_name)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "onboarding step",
                id: step_name.to_string(),
            })
    }

    /// Progress summary for the session behind `token`.
    pub async fn progress(&self, token: &str) -> Result<ProgressSummary, CoreError> {
        let session = self.sessions.resolve_by_token(token).await?;
        self.summarize(&session).await
    }

    // -- Internals ----------------------------------------------------------

    /// Resolve the token and refuse writes to terminal sessions.
    /// Expired sessions are already rejected inside `resolve_by_token`.
    async fn writable_session(&self, token: &str) -> Result<OnboardingSession, CoreError> {
        let session = self.sessions.resolve_by_token(token).await?;
        if session.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                entity: "onboarding session",
                id: session.id,
                action: "complete step",
                current: session.status.as_str().to_string(),
            });
        }
        Ok(session)
    }

    async fn summarize(&self, session: &OnboardingSession) -> Result<ProgressSummary, CoreError> {
        let completed: Vec<String> = self
            .store
            .list_steps(session.id)
            .await?
            .into_iter()
            .map(|r| r.step_name)
            .collect();

        // Re-read the status: resolve_by_token may have advanced it.
        let current = self
            .store
            .get_session(session.id)
            .await?
            .map(|s| s.status)
            .unwrap_or(session.status);

        Ok(ProgressSummary {
            progress_percentage: self.registry().progress_percentage(&completed),
            total_required: self.registry().required_employee_steps().len(),
            completed_steps: completed,
            session_status: current,
        })
    }
}
