//! Shared fixtures for lifecycle integration tests.
//!
//! Everything runs against `MemoryStore`, which enforces the same
//! uniqueness rules as the SQL schema.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use innboard_core::application::{
    ApplicantProfile, Application, ApplicationFilter, ApplicationPatch, ApplicationStatus,
    EmploymentType, JobOffer, PayFrequency, SubmitApplication,
};
use innboard_core::employee::Employee;
use innboard_core::error::CoreError;
use innboard_core::lifecycle::ApplicationLifecycle;
use innboard_core::memory::MemoryStore;
use innboard_core::onboarding::OnboardingSessions;
use innboard_core::session::{OnboardingSession, SessionPatch, SessionStatus};
use innboard_core::steps::{StepRecord, StepRegistry};
use innboard_core::store::{RecordStore, User};
use innboard_core::tracker::StepTracker;
use innboard_core::types::DbId;

pub struct Fixture {
    pub store: MemoryStore,
    pub lifecycle: ApplicationLifecycle,
    pub sessions: OnboardingSessions,
    pub tracker: StepTracker,
    pub property_id: DbId,
    pub reviewer_id: DbId,
}

/// Build managers over a fresh store with one reviewer scoped to one
/// property.
pub async fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let property_id = uuid::Uuid::new_v4();
    let reviewer_id = uuid::Uuid::new_v4();

    store
        .seed_user(User {
            id: reviewer_id,
            name: "Riley HR".into(),
            role: "manager".into(),
            property_ids: vec![property_id],
        })
        .await;

    let shared: Arc<dyn RecordStore> = Arc::new(store.clone());
    let sessions = OnboardingSessions::new(Arc::clone(&shared), StepRegistry::standard());
    let lifecycle = ApplicationLifecycle::new(Arc::clone(&shared), sessions.clone());
    let tracker = StepTracker::new(sessions.clone());

    Fixture {
        store,
        lifecycle,
        sessions,
        tracker,
        property_id,
        reviewer_id,
    }
}

/// A front-desk agent submission for the fixture property.
pub fn submission(fx: &Fixture, email: &str) -> SubmitApplication {
    submission_for(fx.property_id, "Front Desk", "Agent", email)
}

pub fn submission_for(
    property_id: DbId,
    department: &str,
    position: &str,
    email: &str,
) -> SubmitApplication {
    SubmitApplication {
        property_id,
        department: department.into(),
        position: position.into(),
        applicant: ApplicantProfile {
            first_name: "Ada".into(),
            last_name: "Li".into(),
            email: email.into(),
            phone: Some("+1 555 0100".into()),
            details: serde_json::json!({ "availability": "weekends" }),
        },
    }
}

pub fn offer() -> JobOffer {
    JobOffer {
        hire_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        pay_rate: 21.50,
        pay_frequency: PayFrequency::Biweekly,
        employment_type: EmploymentType::FullTime,
        manager_id: None,
    }
}

/// A store in which a rival writer can be armed to decide a row between a
/// manager's read and its conditional write, so lost-race branches can be
/// exercised deterministically.
pub struct ContestedStore {
    inner: MemoryStore,
    rival_application: Mutex<Option<ApplicationStatus>>,
    rival_session: Mutex<Option<SessionStatus>>,
}

impl ContestedStore {
    pub fn new(inner: MemoryStore) -> Self {
        ContestedStore {
            inner,
            rival_application: Mutex::new(None),
            rival_session: Mutex::new(None),
        }
    }

    /// Arm a rival reviewer decision applied just before the next
    /// conditional application write.
    pub fn rival_application_decision(&self, status: ApplicationStatus) {
        *self.rival_application.lock().unwrap() = Some(status);
    }

    /// Arm a rival session transition applied just before the next
    /// conditional session write.
    pub fn rival_session_decision(&self, status: SessionStatus) {
        *self.rival_session.lock().unwrap() = Some(status);
    }
}

#[async_trait]
impl RecordStore for ContestedStore {
    async fn create_application(
        &self,
        application: &Application,
    ) -> Result<Application, CoreError> {
        self.inner.create_application(application).await
    }

    async fn get_application(&self, id: DbId) -> Result<Option<Application>, CoreError> {
        self.inner.get_application(id).await
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, CoreError> {
        self.inner.list_applications(filter).await
    }

    async fn update_application(
        &self,
        id: DbId,
        patch: &ApplicationPatch,
    ) -> Result<Application, CoreError> {
        self.inner.update_application(id, patch).await
    }

    async fn transition_application(
        &self,
        id: DbId,
        expected: ApplicationStatus,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>, CoreError> {
        let rival = self.rival_application.lock().unwrap().take();
        if let Some(status) = rival {
            let steal = ApplicationPatch {
                status: Some(status),
                ..Default::default()
            };
            self.inner.update_application(id, &steal).await?;
        }
        self.inner.transition_application(id, expected, patch).await
    }

    async fn create_employee(&self, employee: &Employee) -> Result<Employee, CoreError> {
        self.inner.create_employee(employee).await
    }

    async fn get_employee(&self, id: DbId) -> Result<Option<Employee>, CoreError> {
        self.inner.get_employee(id).await
    }

    async fn find_employee_by_application(
        &self,
        application_id: DbId,
    ) -> Result<Option<Employee>, CoreError> {
        self.inner.find_employee_by_application(application_id).await
    }

    async fn update_employee_status(
        &self,
        id: DbId,
        status: SessionStatus,
    ) -> Result<(), CoreError> {
        self.inner.update_employee_status(id, status).await
    }

    async fn create_session(
        &self,
        session: &OnboardingSession,
    ) -> Result<OnboardingSession, CoreError> {
        self.inner.create_session(session).await
    }

    async fn get_session(&self, id: DbId) -> Result<Option<OnboardingSession>, CoreError> {
        self.inner.get_session(id).await
    }

    async fn get_session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<OnboardingSession>, CoreError> {
        self.inner.get_session_by_token_hash(token_hash).await
    }

    async fn update_session(
        &self,
        id: DbId,
        patch: &SessionPatch,
    ) -> Result<OnboardingSession, CoreError> {
        self.inner.update_session(id, patch).await
    }

    async fn transition_session(
        &self,
        id: DbId,
        expected: SessionStatus,
        patch: &SessionPatch,
    ) -> Result<Option<OnboardingSession>, CoreError> {
        let rival = self.rival_session.lock().unwrap().take();
        if let Some(status) = rival {
            let steal = SessionPatch {
                status: Some(status),
                ..Default::default()
            };
            self.inner.update_session(id, &steal).await?;
        }
        self.inner.transition_session(id, expected, patch).await
    }

    async fn upsert_step(&self, record: &StepRecord) -> Result<StepRecord, CoreError> {
        self.inner.upsert_step(record).await
    }

    async fn get_step(
        &self,
        session_id: DbId,
        step_name: &str,
    ) -> Result<Option<StepRecord>, CoreError> {
        self.inner.get_step(session_id, step_name).await
    }

    async fn list_steps(&self, session_id: DbId) -> Result<Vec<StepRecord>, CoreError> {
        self.inner.list_steps(session_id).await
    }

    async fn get_user(&self, id: DbId) -> Result<Option<User>, CoreError> {
        self.inner.get_user(id).await
    }
}

pub struct ContestedFixture {
    pub store: Arc<ContestedStore>,
    pub lifecycle: ApplicationLifecycle,
    pub sessions: OnboardingSessions,
    pub property_id: DbId,
    pub reviewer_id: DbId,
}

/// Like [`fixture`], but over a [`ContestedStore`] so tests can force a
/// conditional write to lose.
pub async fn contested_fixture() -> ContestedFixture {
    let inner = MemoryStore::new();
    let property_id = uuid::Uuid::new_v4();
    let reviewer_id = uuid::Uuid::new_v4();

    inner
        .seed_user(User {
            id: reviewer_id,
            name: "Riley HR".into(),
            role: "manager".into(),
            property_ids: vec![property_id],
        })
        .await;

    let store = Arc::new(ContestedStore::new(inner));
    let shared: Arc<dyn RecordStore> = store.clone();
    let sessions = OnboardingSessions::new(Arc::clone(&shared), StepRegistry::standard());
    let lifecycle = ApplicationLifecycle::new(shared, sessions.clone());

    ContestedFixture {
        store,
        lifecycle,
        sessions,
        property_id,
        reviewer_id,
    }
}
