//! Onboarding session manager.
//!
//! Owns session creation, token resolution, stage transitions, and lazy
//! expiration. Every status change is mirrored onto the employee record's
//! `onboarding_status`; the session row remains the source of truth.

use std::sync::Arc;

use serde::Serialize;

use crate::employee::Employee;
use crate::error::CoreError;
use crate::session::{
    self, GeneratedToken, OnboardingSession, SessionAction, SessionPatch, SessionStatus,
};
use crate::steps::StepRegistry;
use crate::store::RecordStore;
use crate::types::{DbId, Timestamp};

/// A freshly created session together with its one-time plaintext token.
#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub session: OnboardingSession,
    /// Shown to the caller exactly once; only the hash is persisted.
    pub token: String,
    pub expires_at: Timestamp,
}

#[derive(Clone)]
pub struct OnboardingSessions {
    store: Arc<dyn RecordStore>,
    registry: StepRegistry,
    default_expiry_hours: i64,
}

impl OnboardingSessions {
    pub fn new(store: Arc<dyn RecordStore>, registry: StepRegistry) -> Self {
        OnboardingSessions {
            store,
            registry,
            default_expiry_hours: session::DEFAULT_EXPIRY_HOURS,
        }
    }

    /// Override the lifetime used when callers pass no explicit expiry.
    pub fn with_default_expiry(mut self, hours: i64) -> Self {
        self.default_expiry_hours = hours;
        self
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub(crate) fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    // -- Creation -----------------------------------------------------------

    /// Create a token-gated session for an employee. `expires_in_hours`
    /// falls back to the configured default when `None`.
    pub async fn create(
        &self,
        employee: &Employee,
        expires_in_hours: Option<i64>,
    ) -> Result<CreatedSession, CoreError> {
        let hours = expires_in_hours.unwrap_or(self.default_expiry_hours);
        if hours <= 0 {
            return Err(CoreError::Validation(
                "session expiry must be a positive number of hours".to_string(),
            ));
        }

        let GeneratedToken { plaintext, hash } = session::generate_token();
        let now = chrono::Utc::now();
        let expires_at = now + chrono::Duration::hours(hours);

        let new_session = OnboardingSession {
            id: uuid::Uuid::new_v4(),
            employee_id: employee.id,
            application_id: employee.application_id,
            property_id: employee.property_id,
            manager_id: employee.manager_id,
            token_hash: hash,
            status: SessionStatus::NotStarted,
            expires_at,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.create_session(&new_session).await?;

        tracing::info!(
            session_id = %stored.id,
            employee_id = %employee.id,
            %expires_at,
            "Onboarding session created"
        );

        Ok(CreatedSession {
            session: stored,
            token: plaintext,
            expires_at,
        })
    }

    // -- Token resolution ---------------------------------------------------

    /// Resolve a session by its access token.
    ///
    /// Fails with `NotFound` for an unknown token and `Expired` once the
    /// clock passes `expires_at` regardless of the stored status. The
    /// first successful resolution advances `not_started -> in_progress`.
    pub async fn resolve_by_token(&self, token: &str) -> Result<OnboardingSession, CoreError> {
        let hash = session::hash_token(token);
        let found = self
            .store
            .get_session_by_token_hash(&hash)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "onboarding session",
                id: "token".to_string(),
            })?;

        let found = self.expire_if_past(found).await?;

        if found.status == SessionStatus::NotStarted {
            // First resolution; a concurrent first resolution losing this
            // race is harmless, so fall back to a re-read on None.
            let patch = SessionPatch {
                status: Some(SessionStatus::InProgress),
                ..Default::default()
            };
            let advanced = self
                .store
                .transition_session(found.id, SessionStatus::NotStarted, &patch)
                .await?;
            let current = match advanced {
                Some(updated) => updated,
                None => self
                    .store
                    .get_session(found.id)
                    .await?
                    .ok_or_else(|| CoreError::not_found("onboarding session", found.id))?,
            };
            self.mirror_to_employee(&current).await?;
            tracing::info!(session_id = %current.id, "Onboarding session started");
            return Ok(current);
        }

        Ok(found)
    }

    // -- Stage transitions --------------------------------------------------

    /// Employee declares their side done: `in_progress -> employee_completed`.
    pub async fn mark_employee_complete(
        &self,
        session_id: DbId,
    ) -> Result<OnboardingSession, CoreError> {
        let updated = self
            .transition(session_id, SessionAction::EmployeeComplete)
            .await?;

        // Informational only; completeness is not a gate here.
        let completed = self.completed_step_names(session_id).await?;
        let progress = self.registry.progress_percentage(&completed);
        if progress < 100 {
            tracing::warn!(
                session_id = %session_id,
                progress,
                "Employee marked complete with required steps outstanding"
            );
        }

        Ok(updated)
    }

    /// Manager picks up the packet: `employee_completed -> manager_review`.
    pub async fn mark_manager_reviewed(
        &self,
        session_id: DbId,
    ) -> Result<OnboardingSession, CoreError> {
        self.transition(session_id, SessionAction::BeginManagerReview)
            .await
    }

    /// Finish the session: `manager_review -> completed`, allowed only
    /// once every required manager-side step has been recorded.
    pub async fn complete(&self, session_id: DbId) -> Result<OnboardingSession, CoreError> {
        let completed = self.completed_step_names(session_id).await?;
        let missing: Vec<&str> = self
            .registry
            .required_manager_steps()
            .into_iter()
            .filter(|name| !completed.iter().any(|c| c == name))
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "manager-side steps outstanding: {}",
                missing.join(", ")
            )));
        }

        self.transition(session_id, SessionAction::Complete).await
    }

    // -- Internals ----------------------------------------------------------

    /// Apply a single-step transition with expiry and legality checks.
    async fn transition(
        &self,
        session_id: DbId,
        action: SessionAction,
    ) -> Result<OnboardingSession, CoreError> {
        let current = self
            .store
            .get_session(session_id)
            .await?
            .ok_or_else(|| CoreError::not_found("onboarding session", session_id))?;

        let current = self.expire_if_past(current).await?;

        let Some(next) = current.status.apply(action) else {
            return Err(current.invalid_transition(action));
        };

        let patch = SessionPatch {
            status: Some(next),
            ..Default::default()
        };
        let updated = match self
            .store
            .transition_session(session_id, current.status, &patch)
            .await?
        {
            Some(updated) => updated,
            None => {
                // Lost a race; re-read so the error names the status now
                // in effect.
                let fresh = self
                    .store
                    .get_session(session_id)
                    .await?
                    .ok_or_else(|| CoreError::not_found("onboarding session", session_id))?;
                return Err(fresh.invalid_transition(action));
            }
        };

        self.mirror_to_employee(&updated).await?;

        tracing::info!(
            session_id = %session_id,
            from = current.status.as_str(),
            to = next.as_str(),
            "Onboarding session transitioned"
        );

        Ok(updated)
    }

    /// Lazy expiration: if the clock passed `expires_at`, persist the
    /// `expired` status and fail with [`CoreError::Expired`].
    pub(crate) async fn expire_if_past(
        &self,
        session: OnboardingSession,
    ) -> Result<OnboardingSession, CoreError> {
        if !session.is_expired_at(chrono::Utc::now()) {
            return Ok(session);
        }

        if !session.status.is_terminal() {
            let patch = SessionPatch {
                status: Some(SessionStatus::Expired),
                ..Default::default()
            };
            match self
                .store
                .transition_session(session.id, session.status, &patch)
                .await?
            {
                Some(expired) => {
                    self.mirror_to_employee(&expired).await?;
                    tracing::info!(session_id = %session.id, "Onboarding session expired");
                }
                None => {
                    tracing::debug!(
                        session_id = %session.id,
                        "Session moved concurrently while expiring; leaving as-is"
                    );
                }
            }
        }

        Err(CoreError::Expired)
    }

    async fn mirror_to_employee(&self, session: &OnboardingSession) -> Result<(), CoreError> {
        self.store
            .update_employee_status(session.employee_id, session.status)
            .await
    }

    async fn completed_step_names(&self, session_id: DbId) -> Result<Vec<String>, CoreError> {
        Ok(self
            .store
            .list_steps(session_id)
            .await?
            .into_iter()
            .map(|r| r.step_name)
            .collect())
    }
}
