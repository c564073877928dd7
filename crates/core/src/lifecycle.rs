//! Application lifecycle manager.
//!
//! Owns every reviewer-facing transition of a job application. Approval is
//! a saga: the status flip is a conditional transition (exactly one of two
//! racing reviewers wins), then employee creation, session creation, and
//! competing-applicant resolution run as independently retriable steps.
//! If employee or session creation fails, the application is compensated
//! back to `pending` so no approval is left half-applied.

use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use crate::application::{
    Application, ApplicationFilter, ApplicationPatch, ApplicationStatus, JobOffer,
    RejectApplication, ReviewAction, SubmitApplication,
};
use crate::employee::Employee;
use crate::error::CoreError;
use crate::fingerprint;
use crate::onboarding::{CreatedSession, OnboardingSessions};
use crate::resolver::CompetingApplicantResolver;
use crate::store::RecordStore;
use crate::types::DbId;

/// Everything produced by a successful approval.
#[derive(Debug, Serialize)]
pub struct ApprovalOutcome {
    pub application: Application,
    pub employee: Employee,
    pub session: CreatedSession,
    /// Competing pending applications moved to the talent pool.
    pub competitors_moved: usize,
}

/// Per-id outcome of a bulk talent-pool move. The batch never aborts on a
/// single bad id.
#[derive(Debug, Serialize)]
pub struct BulkMoveOutcome {
    pub application_id: DbId,
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ApplicationLifecycle {
    store: Arc<dyn RecordStore>,
    sessions: OnboardingSessions,
    resolver: CompetingApplicantResolver,
}

impl ApplicationLifecycle {
    pub fn new(store: Arc<dyn RecordStore>, sessions: OnboardingSessions) -> Self {
        let resolver = CompetingApplicantResolver::new(Arc::clone(&store));
        ApplicationLifecycle {
            store,
            sessions,
            resolver,
        }
    }

    // -- Submission ---------------------------------------------------------

    /// Submit a new application.
    ///
    /// Fails with [`CoreError::DuplicatePending`] when a pending
    /// application with the same (email, property, position) fingerprint
    /// exists; the store's uniqueness constraint backs this, so two
    /// concurrent submissions cannot both slip through.
    pub async fn submit(&self, input: SubmitApplication) -> Result<Application, CoreError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let fingerprint = fingerprint::application_fingerprint(
            &input.applicant.email,
            input.property_id,
            &input.position,
        );

        let application = Application {
            id: uuid::Uuid::new_v4(),
            property_id: input.property_id,
            department: input.department,
            position: input.position,
            applicant: input.applicant,
            status: ApplicationStatus::Pending,
            fingerprint,
            applied_at: chrono::Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
            talent_pool_at: None,
            rejection_reason: None,
            rejection_feedback: None,
        };

        let stored = self.store.create_application(&application).await?;

        tracing::info!(
            application_id = %stored.id,
            property_id = %stored.property_id,
            position = %stored.position,
            "Application submitted"
        );

        Ok(stored)
    }

    // -- Approval saga ------------------------------------------------------

    /// Approve a pending application: flip the status, create the employee
    /// and onboarding session, then resolve competing applicants.
    pub async fn approve(
        &self,
        application_id: DbId,
        reviewer_id: DbId,
        offer: JobOffer,
    ) -> Result<ApprovalOutcome, CoreError> {
        offer
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let application = self.load(application_id).await?;
        self.authorize(reviewer_id, &application).await?;

        let now = chrono::Utc::now();
        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Approved),
            reviewed_by: Some(Some(reviewer_id)),
            reviewed_at: Some(Some(now)),
            ..Default::default()
        };
        let approved = self
            .transition_or_report(
                application_id,
                ApplicationStatus::Pending,
                &patch,
                ReviewAction::Approve,
            )
            .await?;

        // Employee creation is idempotent under retry: reuse an existing
        // record left by a previously interrupted approval.
        let employee = match self
            .store
            .find_employee_by_application(application_id)
            .await?
        {
            Some(existing) => existing,
            None => {
                let employee = Employee::from_offer(&approved, reviewer_id, &offer);
                match self.store.create_employee(&employee).await {
                    Ok(created) => created,
                    Err(err) => {
                        self.compensate_approval(application_id).await;
                        return Err(err);
                    }
                }
            }
        };

        let session = match self.sessions.create(&employee, None).await {
            Ok(created) => created,
            Err(err) => {
                self.compensate_approval(application_id).await;
                return Err(err);
            }
        };

        let competitors_moved = self
            .resolver
            .resolve(
                approved.property_id,
                &approved.position,
                application_id,
                reviewer_id,
            )
            .await?;

        tracing::info!(
            application_id = %application_id,
            reviewer_id = %reviewer_id,
            employee_id = %employee.id,
            session_id = %session.session.id,
            competitors_moved,
            "Application approved"
        );

        Ok(ApprovalOutcome {
            application: approved,
            employee,
            session,
            competitors_moved,
        })
    }

    /// Compensating action: put an approval back to `pending` after a
    /// failed side effect. Best effort; a failure here leaves the row
    /// `approved` without an employee, which the idempotent retry path
    /// repairs on the next attempt.
    async fn compensate_approval(&self, application_id: DbId) {
        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Pending),
            reviewed_by: Some(None),
            reviewed_at: Some(None),
            ..Default::default()
        };
        match self
            .store
            .transition_application(application_id, ApplicationStatus::Approved, &patch)
            .await
        {
            Ok(Some(_)) => {
                tracing::warn!(
                    application_id = %application_id,
                    "Approval side effect failed; application rolled back to pending"
                );
            }
            Ok(None) | Err(_) => {
                tracing::error!(
                    application_id = %application_id,
                    "Approval side effect failed and rollback did not apply; retry will repair"
                );
            }
        }
    }

    // -- Rejection ----------------------------------------------------------

    pub async fn reject(
        &self,
        application_id: DbId,
        reviewer_id: DbId,
        input: RejectApplication,
    ) -> Result<Application, CoreError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let application = self.load(application_id).await?;
        self.authorize(reviewer_id, &application).await?;

        let now = chrono::Utc::now();
        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Rejected),
            reviewed_by: Some(Some(reviewer_id)),
            reviewed_at: Some(Some(now)),
            rejection_reason: Some(Some(input.reason)),
            rejection_feedback: Some(input.feedback),
            ..Default::default()
        };
        let rejected = self
            .transition_or_report(
                application_id,
                ApplicationStatus::Pending,
                &patch,
                ReviewAction::Reject,
            )
            .await?;

        tracing::info!(
            application_id = %application_id,
            reviewer_id = %reviewer_id,
            "Application rejected"
        );

        Ok(rejected)
    }

    // -- Talent pool --------------------------------------------------------

    pub async fn move_to_talent_pool(
        &self,
        application_id: DbId,
        reviewer_id: DbId,
    ) -> Result<Application, CoreError> {
        let application = self.load(application_id).await?;
        self.authorize(reviewer_id, &application).await?;

        let now = chrono::Utc::now();
        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::TalentPool),
            reviewed_by: Some(Some(reviewer_id)),
            reviewed_at: Some(Some(now)),
            talent_pool_at: Some(Some(now)),
            ..Default::default()
        };
        let moved = self
            .transition_or_report(
                application_id,
                ApplicationStatus::Pending,
                &patch,
                ReviewAction::MoveToTalentPool,
            )
            .await?;

        tracing::info!(
            application_id = %application_id,
            reviewer_id = %reviewer_id,
            "Application moved to talent pool"
        );

        Ok(moved)
    }

    /// Move several applications to the talent pool, reporting each id's
    /// outcome independently.
    pub async fn bulk_move_to_talent_pool(
        &self,
        application_ids: &[DbId],
        reviewer_id: DbId,
    ) -> Vec<BulkMoveOutcome> {
        let mut outcomes = Vec::with_capacity(application_ids.len());
        for &id in application_ids {
            let outcome = match self.move_to_talent_pool(id, reviewer_id).await {
                Ok(_) => BulkMoveOutcome {
                    application_id: id,
                    moved: true,
                    error: None,
                },
                Err(err) => BulkMoveOutcome {
                    application_id: id,
                    moved: false,
                    error: Some(err.to_string()),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    // -- Reactivation -------------------------------------------------------

    /// Bring a talent-pool application back to `pending`.
    pub async fn reactivate(
        &self,
        application_id: DbId,
        reviewer_id: DbId,
    ) -> Result<Application, CoreError> {
        let application = self.load(application_id).await?;
        self.authorize(reviewer_id, &application).await?;

        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Pending),
            reviewed_by: Some(None),
            reviewed_at: Some(None),
            talent_pool_at: Some(None),
            ..Default::default()
        };
        let reactivated = self
            .transition_or_report(
                application_id,
                ApplicationStatus::TalentPool,
                &patch,
                ReviewAction::Reactivate,
            )
            .await?;

        tracing::info!(
            application_id = %application_id,
            reviewer_id = %reviewer_id,
            "Application reactivated from talent pool"
        );

        Ok(reactivated)
    }

    // -- Withdrawal ---------------------------------------------------------

    /// Applicant-initiated withdrawal; no reviewer authority involved.
    pub async fn withdraw(&self, application_id: DbId) -> Result<Application, CoreError> {
        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Withdrawn),
            ..Default::default()
        };
        let withdrawn = self
            .transition_or_report(
                application_id,
                ApplicationStatus::Pending,
                &patch,
                ReviewAction::Withdraw,
            )
            .await?;

        tracing::info!(application_id = %application_id, "Application withdrawn");

        Ok(withdrawn)
    }

    // -- Queries ------------------------------------------------------------

    pub async fn get(&self, application_id: DbId) -> Result<Application, CoreError> {
        self.load(application_id).await
    }

    pub async fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, CoreError> {
        self.store.list_applications(filter).await
    }

    // -- Internals ----------------------------------------------------------

    async fn load(&self, application_id: DbId) -> Result<Application, CoreError> {
        self.store
            .get_application(application_id)
            .await?
            .ok_or_else(|| CoreError::not_found("application", application_id))
    }

    /// Conditionally transition an application. On a lost race, re-read
    /// the row so the error names the status now in effect, not the one
    /// observed before the write.
    async fn transition_or_report(
        &self,
        application_id: DbId,
        expected: ApplicationStatus,
        patch: &ApplicationPatch,
        action: ReviewAction,
    ) -> Result<Application, CoreError> {
        match self
            .store
            .transition_application(application_id, expected, patch)
            .await?
        {
            Some(updated) => Ok(updated),
            None => {
                let current = self.load(application_id).await?;
                Err(current.invalid_transition(action))
            }
        }
    }

    /// Property-scoped authority check. Reads the store directly on every
    /// call; authorization is never answered from a cache.
    async fn authorize(&self, reviewer_id: DbId, application: &Application) -> Result<(), CoreError> {
        let reviewer = self
            .store
            .get_user(reviewer_id)
            .await?
            .ok_or_else(|| CoreError::Forbidden("unknown reviewer".to_string()))?;

        if !reviewer.has_property(application.property_id) {
            return Err(CoreError::Forbidden(format!(
                "reviewer has no authority over property {}",
                application.property_id
            )));
        }
        Ok(())
    }
}
