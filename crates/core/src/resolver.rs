//! Competing-applicant resolution.
//!
//! When an application is approved for a property+position, every other
//! application still pending for that exact pair moves to the talent pool,
//! attributed to the same reviewer. The move is a conditional transition,
//! so a row approved, rejected, or withdrawn by a concurrent reviewer
//! between the listing and the write is skipped rather than failed.

use std::sync::Arc;

use crate::application::{ApplicationFilter, ApplicationPatch, ApplicationStatus};
use crate::error::CoreError;
use crate::store::RecordStore;
use crate::types::DbId;

pub struct CompetingApplicantResolver {
    store: Arc<dyn RecordStore>,
}

impl CompetingApplicantResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        CompetingApplicantResolver { store }
    }

    /// Move all other pending applications for `property_id` + `position`
    /// to the talent pool. Returns the count moved.
    ///
    /// Idempotent: a second run finds no pending rows and moves zero.
    pub async fn resolve(
        &self,
        property_id: DbId,
        position: &str,
        approved_application_id: DbId,
        reviewer_id: DbId,
    ) -> Result<usize, CoreError> {
        let filter = ApplicationFilter {
            property_id: Some(property_id),
            position: Some(position.to_string()),
            status: Some(ApplicationStatus::Pending),
        };
        let pending = self.store.list_applications(&filter).await?;

        let now = chrono::Utc::now();
        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::TalentPool),
            reviewed_by: Some(Some(reviewer_id)),
            reviewed_at: Some(Some(now)),
            talent_pool_at: Some(Some(now)),
            ..Default::default()
        };

        let mut moved = 0;
        for application in pending {
            if application.id == approved_application_id {
                continue;
            }
            match self
                .store
                .transition_application(application.id, ApplicationStatus::Pending, &patch)
                .await?
            {
                Some(_) => {
                    moved += 1;
                    tracing::info!(
                        application_id = %application.id,
                        %property_id,
                        position,
                        "Competing application moved to talent pool"
                    );
                }
                None => {
                    // Decided by a concurrent reviewer since the listing.
                    tracing::debug!(
                        application_id = %application.id,
                        "Competing application already decided; skipping"
                    );
                }
            }
        }

        Ok(moved)
    }
}
