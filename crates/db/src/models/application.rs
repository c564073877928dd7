//! Application row model.

use sqlx::FromRow;

use innboard_core::application::{ApplicantProfile, Application, ApplicationStatus};
use innboard_core::error::CoreError;
use innboard_core::types::{DbId, Timestamp};

/// An application row from the `applications` table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: DbId,
    pub property_id: DbId,
    pub department: String,
    pub position: String,
    pub applicant: serde_json::Value,
    pub status: String,
    pub fingerprint: String,
    pub applied_at: Timestamp,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub talent_pool_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub rejection_feedback: Option<String>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = CoreError;

    fn try_from(row: ApplicationRow) -> Result<Application, CoreError> {
        let status = ApplicationStatus::parse(&row.status).ok_or_else(|| {
            CoreError::Store(format!("unknown application status '{}'", row.status))
        })?;
        let applicant: ApplicantProfile = serde_json::from_value(row.applicant)
            .map_err(|e| CoreError::Store(format!("malformed applicant profile: {e}")))?;

        Ok(Application {
            id: row.id,
            property_id: row.property_id,
            department: row.department,
            position: row.position,
            applicant,
            status,
            fingerprint: row.fingerprint,
            applied_at: row.applied_at,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            talent_pool_at: row.talent_pool_at,
            rejection_reason: row.rejection_reason,
            rejection_feedback: row.rejection_feedback,
        })
    }
}
