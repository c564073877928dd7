//! The abstract record store the lifecycle managers read and write through.
//!
//! Implementations: `MemoryStore` in this crate (tests, local dev) and
//! `PgRecordStore` in `innboard-db` (production). No in-memory cache of
//! application or session state may be treated as authoritative; managers
//! always go through this trait.
//!
//! Conditional transitions (`transition_application`, `transition_session`)
//! are the concurrency primitive: they apply a patch only if the row is
//! still in the expected status and return `Ok(None)` otherwise. This is
//! how exactly one of two racing reviewers wins, and how the competing-
//! applicant resolver treats already-decided rows as no-ops.

use async_trait::async_trait;
use serde::Serialize;

use crate::application::{Application, ApplicationFilter, ApplicationPatch, ApplicationStatus};
use crate::employee::Employee;
use crate::error::CoreError;
use crate::session::{OnboardingSession, SessionPatch, SessionStatus};
use crate::steps::StepRecord;
use crate::types::DbId;

/// A reviewer / manager account, used for property-authority checks.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    /// `"admin"` bypasses property scoping; anything else is scoped.
    pub role: String,
    /// Properties this user may act on.
    pub property_ids: Vec<DbId>,
}

impl User {
    /// Whether this user may act on applications for `property_id`.
    pub fn has_property(&self, property_id: DbId) -> bool {
        self.role == "admin" || self.property_ids.contains(&property_id)
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    // -- Applications -------------------------------------------------------

    /// Insert a new application. Fails with [`CoreError::DuplicatePending`]
    /// if a pending application with the same fingerprint already exists
    /// (enforced by a store-level uniqueness constraint, not check-then-
    /// insert).
    async fn create_application(&self, application: &Application)
        -> Result<Application, CoreError>;

    async fn get_application(&self, id: DbId) -> Result<Option<Application>, CoreError>;

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, CoreError>;

    /// Unconditional patch. Fails with `NotFound` if the row is missing.
    async fn update_application(
        &self,
        id: DbId,
        patch: &ApplicationPatch,
    ) -> Result<Application, CoreError>;

    /// Apply `patch` only if the application is still in `expected`.
    /// `Ok(None)` means the row exists but is no longer in that status.
    async fn transition_application(
        &self,
        id: DbId,
        expected: ApplicationStatus,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>, CoreError>;

    // -- Employees ----------------------------------------------------------

    /// Insert a new employee. Fails with [`CoreError::Conflict`] if one
    /// already exists for the same application (unique 1:1 constraint).
    async fn create_employee(&self, employee: &Employee) -> Result<Employee, CoreError>;

    async fn get_employee(&self, id: DbId) -> Result<Option<Employee>, CoreError>;

    async fn find_employee_by_application(
        &self,
        application_id: DbId,
    ) -> Result<Option<Employee>, CoreError>;

    /// Mirror the onboarding session status onto the employee record.
    async fn update_employee_status(
        &self,
        id: DbId,
        status: SessionStatus,
    ) -> Result<(), CoreError>;

    // -- Onboarding sessions ------------------------------------------------

    async fn create_session(
        &self,
        session: &OnboardingSession,
    ) -> Result<OnboardingSession, CoreError>;

    async fn get_session(&self, id: DbId) -> Result<Option<OnboardingSession>, CoreError>;

    /// Look up a session by the digest of a presented token.
    async fn get_session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<OnboardingSession>, CoreError>;

    async fn update_session(
        &self,
        id: DbId,
        patch: &SessionPatch,
    ) -> Result<OnboardingSession, CoreError>;

    /// Apply `patch` only if the session is still in `expected`.
    async fn transition_session(
        &self,
        id: DbId,
        expected: SessionStatus,
        patch: &SessionPatch,
    ) -> Result<Option<OnboardingSession>, CoreError>;

    // -- Step records -------------------------------------------------------

    /// Insert or overwrite the record for `(session_id, step_name)`.
    async fn upsert_step(&self, record: &StepRecord) -> Result<StepRecord, CoreError>;

    async fn get_step(
        &self,
        session_id: DbId,
        step_name: &str,
    ) -> Result<Option<StepRecord>, CoreError>;

    async fn list_steps(&self, session_id: DbId) -> Result<Vec<StepRecord>, CoreError>;

    // -- Users --------------------------------------------------------------

    async fn get_user(&self, id: DbId) -> Result<Option<User>, CoreError>;
}
