//! `RecordStore` implementation backed by PostgreSQL.
//!
//! Repositories return raw `sqlx::Error`; this adapter classifies them
//! into the domain taxonomy. Unique-violation codes are dispatched on the
//! constraint name, so the duplicate-pending rule and the one-employee-
//! per-application rule come out as their own variants rather than a
//! generic storage failure.

use async_trait::async_trait;

use innboard_core::application::{
    Application, ApplicationFilter, ApplicationPatch, ApplicationStatus,
};
use innboard_core::employee::Employee;
use innboard_core::error::CoreError;
use innboard_core::session::{OnboardingSession, SessionPatch, SessionStatus};
use innboard_core::steps::StepRecord;
use innboard_core::store::{RecordStore, User};
use innboard_core::types::DbId;

use crate::repositories::{ApplicationRepo, EmployeeRepo, SessionRepo, StepRepo, UserRepo};
use crate::DbPool;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        PgRecordStore { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx failure to a domain error. Details are logged, never
/// surfaced to callers.
fn classify(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return match db_err.constraint() {
                Some("uq_applications_pending_fingerprint") => CoreError::DuplicatePending,
                Some("uq_employees_application_id") => CoreError::Conflict(
                    "an employee record already exists for this application".to_string(),
                ),
                Some("uq_onboarding_sessions_token_hash") => {
                    CoreError::Conflict("session token collision".to_string())
                }
                constraint => {
                    tracing::warn!(?constraint, "Unhandled unique violation");
                    CoreError::Conflict("a conflicting record already exists".to_string())
                }
            };
        }
    }
    tracing::error!(error = %err, "Database operation failed");
    CoreError::Store("database operation failed".to_string())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    // -- Applications -------------------------------------------------------

    async fn create_application(
        &self,
        application: &Application,
    ) -> Result<Application, CoreError> {
        ApplicationRepo::insert(&self.pool, application)
            .await
            .map_err(classify)?
            .try_into()
    }

    async fn get_application(&self, id: DbId) -> Result<Option<Application>, CoreError> {
        ApplicationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(Application::try_from)
            .transpose()
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, CoreError> {
        ApplicationRepo::list(&self.pool, filter)
            .await
            .map_err(classify)?
            .into_iter()
            .map(Application::try_from)
            .collect()
    }

    async fn update_application(
        &self,
        id: DbId,
        patch: &ApplicationPatch,
    ) -> Result<Application, CoreError> {
        ApplicationRepo::update(&self.pool, id, patch)
            .await
            .map_err(classify)?
            .ok_or_else(|| CoreError::not_found("application", id))?
            .try_into()
    }

    async fn transition_application(
        &self,
        id: DbId,
        expected: ApplicationStatus,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>, CoreError> {
        let row = ApplicationRepo::transition(&self.pool, id, expected.as_str(), patch)
            .await
            .map_err(classify)?;
        match row {
            Some(row) => Ok(Some(row.try_into()?)),
            // No match: distinguish a missing row from a lost race.
            None => match self.get_application(id).await? {
                Some(_) => Ok(None),
                None => Err(CoreError::not_found("application", id)),
            },
        }
    }

    // -- Employees ----------------------------------------------------------

    async fn create_employee(&self, employee: &Employee) -> Result<Employee, CoreError> {
        EmployeeRepo::insert(&self.pool, employee)
            .await
            .map_err(classify)?
            .try_into()
    }

    async fn get_employee(&self, id: DbId) -> Result<Option<Employee>, CoreError> {
        EmployeeRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(Employee::try_from)
            .transpose()
    }

    async fn find_employee_by_application(
        &self,
        application_id: DbId,
    ) -> Result<Option<Employee>, CoreError> {
        EmployeeRepo::find_by_application(&self.pool, application_id)
            .await
            .map_err(classify)?
            .map(Employee::try_from)
            .transpose()
    }

    async fn update_employee_status(
        &self,
        id: DbId,
        status: SessionStatus,
    ) -> Result<(), CoreError> {
        let updated = EmployeeRepo::set_onboarding_status(&self.pool, id, status.as_str())
            .await
            .map_err(classify)?;
        if !updated {
            return Err(CoreError::not_found("employee", id));
        }
        Ok(())
    }

    // -- Onboarding sessions ------------------------------------------------

    async fn create_session(
        &self,
        session: &OnboardingSession,
    ) -> Result<OnboardingSession, CoreError> {
        SessionRepo::insert(&self.pool, session)
            .await
            .map_err(classify)?
            .try_into()
    }

    async fn get_session(&self, id: DbId) -> Result<Option<OnboardingSession>, CoreError> {
        SessionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(OnboardingSession::try_from)
            .transpose()
    }

    async fn get_session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<OnboardingSession>, CoreError> {
        SessionRepo::find_by_token_hash(&self.pool, token_hash)
            .await
            .map_err(classify)?
            .map(OnboardingSession::try_from)
            .transpose()
    }

    async fn update_session(
        &self,
        id: DbId,
        patch: &SessionPatch,
    ) -> Result<OnboardingSession, CoreError> {
        SessionRepo::update(&self.pool, id, patch)
            .await
            .map_err(classify)?
            .ok_or_else(|| CoreError::not_found("onboarding session", id))?
            .try_into()
    }

    async fn transition_session(
        &self,
        id: DbId,
        expected: SessionStatus,
        patch: &SessionPatch,
    ) -> Result<Option<OnboardingSession>, CoreError> {
        let row = SessionRepo::transition(&self.pool, id, expected.as_str(), patch)
            .await
            .map_err(classify)?;
        match row {
            Some(row) => Ok(Some(row.try_into()?)),
            None => match self.get_session(id).await? {
                Some(_) => Ok(None),
                None => Err(CoreError::not_found("onboarding session", id)),
            },
        }
    }

    // -- Step records -------------------------------------------------------

    async fn upsert_step(&self, record: &StepRecord) -> Result<StepRecord, CoreError> {
        Ok(StepRepo::upsert(&self.pool, record)
            .await
            .map_err(classify)?
            .into())
    }

    async fn get_step(
        &self,
        session_id: DbId,
        step_name: &str,
    ) -> Result<Option<StepRecord>, CoreError> {
        Ok(StepRepo::find(&self.pool, session_id, step_name)
            .await
            .map_err(classify)?
            .map(StepRecord::from))
    }

    async fn list_steps(&self, session_id: DbId) -> Result<Vec<StepRecord>, CoreError> {
        Ok(StepRepo::list_for_session(&self.pool, session_id)
            .await
            .map_err(classify)?
            .into_iter()
            .map(StepRecord::from)
            .collect())
    }

    // -- Users --------------------------------------------------------------

    async fn get_user(&self, id: DbId) -> Result<Option<User>, CoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(User::from))
    }
}
