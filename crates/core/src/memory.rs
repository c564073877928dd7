//! In-memory [`RecordStore`] used by tests and local development.
//!
//! Enforces the same uniqueness rules the SQL schema does: one pending
//! application per fingerprint, one employee per application, one session
//! per token hash. All maps live behind a single `RwLock`, so conditional
//! transitions are atomic with respect to each other.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::{Application, ApplicationFilter, ApplicationPatch, ApplicationStatus};
use crate::employee::Employee;
use crate::error::CoreError;
use crate::session::{OnboardingSession, SessionPatch, SessionStatus};
use crate::steps::StepRecord;
use crate::store::{RecordStore, User};
use crate::types::DbId;

#[derive(Default)]
struct Inner {
    applications: HashMap<DbId, Application>,
    employees: HashMap<DbId, Employee>,
    sessions: HashMap<DbId, OnboardingSession>,
    steps: HashMap<(DbId, String), StepRecord>,
    users: HashMap<DbId, User>,
}

/// In-memory record store. Cheaply cloneable; clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seed a user account (reviewers/managers for tests).
    pub async fn seed_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }
}

fn apply_application_patch(application: &mut Application, patch: &ApplicationPatch) {
    if let Some(status) = patch.status {
        application.status = status;
    }
    if let Some(reviewed_by) = patch.reviewed_by {
        application.reviewed_by = reviewed_by;
    }
    if let Some(reviewed_at) = patch.reviewed_at {
        application.reviewed_at = reviewed_at;
    }
    if let Some(talent_pool_at) = patch.talent_pool_at {
        application.talent_pool_at = talent_pool_at;
    }
    if let Some(ref reason) = patch.rejection_reason {
        application.rejection_reason = reason.clone();
    }
    if let Some(ref feedback) = patch.rejection_feedback {
        application.rejection_feedback = feedback.clone();
    }
}

fn apply_session_patch(session: &mut OnboardingSession, patch: &SessionPatch) {
    if let Some(status) = patch.status {
        session.status = status;
    }
    if let Some(expires_at) = patch.expires_at {
        session.expires_at = expires_at;
    }
    session.updated_at = chrono::Utc::now();
}

#[async_trait]
impl RecordStore for MemoryStore {
    // -- Applications -------------------------------------------------------

    async fn create_application(
        &self,
        application: &Application,
    ) -> Result<Application, CoreError> {
        let mut inner = self.inner.write().await;
        let duplicate = inner.applications.values().any(|a| {
            a.fingerprint == application.fingerprint && a.status == ApplicationStatus::Pending
        });
        if duplicate {
            return Err(CoreError::DuplicatePending);
        }
        inner
            .applications
            .insert(application.id, application.clone());
        Ok(application.clone())
    }

    async fn get_application(&self, id: DbId) -> Result<Option<Application>, CoreError> {
        Ok(self.inner.read().await.applications.get(&id).cloned())
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, CoreError> {
        let inner = self.inner.read().await;
        let mut matches: Vec<Application> = inner
            .applications
            .values()
            .filter(|a| filter.property_id.is_none_or(|p| a.property_id == p))
            .filter(|a| {
                filter
                    .position
                    .as_deref()
                    .is_none_or(|p| a.position.eq_ignore_ascii_case(p))
            })
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.applied_at);
        Ok(matches)
    }

    async fn update_application(
        &self,
        id: DbId,
        patch: &ApplicationPatch,
    ) -> Result<Application, CoreError> {
        let mut inner = self.inner.write().await;
        let application = inner
            .applications
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("application", id))?;
        apply_application_patch(application, patch);
        Ok(application.clone())
    }

    async fn transition_application(
        &self,
        id: DbId,
        expected: ApplicationStatus,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>, CoreError> {
        let mut inner = self.inner.write().await;
        let application = inner
            .applications
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("application", id))?;
        if application.status != expected {
            return Ok(None);
        }
        apply_application_patch(application, patch);
        Ok(Some(application.clone()))
    }

    // -- Employees ----------------------------------------------------------

    async fn create_employee(&self, employee: &Employee) -> Result<Employee, CoreError> {
        let mut inner = self.inner.write().await;
        let exists = inner
            .employees
            .values()
            .any(|e| e.application_id == employee.application_id);
        if exists {
            return Err(CoreError::Conflict(format!(
                "employee already exists for application {}",
                employee.application_id
            )));
        }
        inner.employees.insert(employee.id, employee.clone());
        Ok(employee.clone())
    }

    async fn get_employee(&self, id: DbId) -> Result<Option<Employee>, CoreError> {
        Ok(self.inner.read().await.employees.get(&id).cloned())
    }

    async fn find_employee_by_application(
        &self,
        application_id: DbId,
    ) -> Result<Option<Employee>, CoreError> {
        Ok(self
            .inner
            .read()
            .await
            .employees
            .values()
            .find(|e| e.application_id == application_id)
            .cloned())
    }

    async fn update_employee_status(
        &self,
        id: DbId,
        status: SessionStatus,
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        let employee = inner
            .employees
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("employee", id))?;
        employee.onboarding_status = status;
        employee.updated_at = chrono::Utc::now();
        Ok(())
    }

    // -- Onboarding sessions ------------------------------------------------

    async fn create_session(
        &self,
        session: &OnboardingSession,
    ) -> Result<OnboardingSession, CoreError> {
        let mut inner = self.inner.write().await;
        let collision = inner
            .sessions
            .values()
            .any(|s| s.token_hash == session.token_hash);
        if collision {
            return Err(CoreError::Conflict("session token collision".to_string()));
        }
        inner.sessions.insert(session.id, session.clone());
        Ok(session.clone())
    }

    async fn get_session(&self, id: DbId) -> Result<Option<OnboardingSession>, CoreError> {
        Ok(self.inner.read().await.sessions.get(&id).cloned())
    }

    async fn get_session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<OnboardingSession>, CoreError> {
        Ok(self
            .inner
            .read()
            .await
            .sessions
            .values()
            .find(|s| s.token_hash == token_hash)
            .cloned())
    }

    async fn update_session(
        &self,
        id: DbId,
        patch: &SessionPatch,
    ) -> Result<OnboardingSession, CoreError> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("onboarding session", id))?;
        apply_session_patch(session, patch);
        Ok(session.clone())
    }

    async fn transition_session(
        &self,
        id: DbId,
        expected: SessionStatus,
        patch: &SessionPatch,
    ) -> Result<Option<OnboardingSession>, CoreError> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("onboarding session", id))?;
        if session.status != expected {
            return Ok(None);
        }
        apply_session_patch(session, patch);
        Ok(Some(session.clone()))
    }

    // -- Step records -------------------------------------------------------

    async fn upsert_step(&self, record: &StepRecord) -> Result<StepRecord, CoreError> {
        let mut inner = self.inner.write().await;
        inner.steps.insert(
            (record.session_id, record.step_name.clone()),
            record.clone(),
        );
        Ok(record.clone())
    }

    async fn get_step(
        &self,
        session_id: DbId,
        step_name: &str,
    ) -> Result<Option<StepRecord>, CoreError> {
        Ok(self
            .inner
            .read()
            .await
            .steps
            .get(&(session_id, step_name.to_string()))
            .cloned())
    }

    async fn list_steps(&self, session_id: DbId) -> Result<Vec<StepRecord>, CoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<StepRecord> = inner
            .steps
            .values()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.completed_at);
        Ok(records)
    }

    // -- Users --------------------------------------------------------------

    async fn get_user(&self, id: DbId) -> Result<Option<User>, CoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }
}
