//! Onboarding session row model.

use sqlx::FromRow;

use innboard_core::error::CoreError;
use innboard_core::session::{OnboardingSession, SessionStatus};
use innboard_core::types::{DbId, Timestamp};

/// A session row from the `onboarding_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub employee_id: DbId,
    pub application_id: DbId,
    pub property_id: DbId,
    pub manager_id: DbId,
    pub token_hash: String,
    pub status: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<SessionRow> for OnboardingSession {
    type Error = CoreError;

    fn try_from(row: SessionRow) -> Result<OnboardingSession, CoreError> {
        let status = SessionStatus::parse(&row.status)
            .ok_or_else(|| CoreError::Store(format!("unknown session status '{}'", row.status)))?;

        Ok(OnboardingSession {
            id: row.id,
            employee_id: row.employee_id,
            application_id: row.application_id,
            property_id: row.property_id,
            manager_id: row.manager_id,
            token_hash: row.token_hash,
            status,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
