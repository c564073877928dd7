//! Onboarding step row model.

use sqlx::FromRow;

use innboard_core::steps::StepRecord;
use innboard_core::types::{DbId, Timestamp};

/// A step row from the `onboarding_steps` table. Maps 1:1 onto the
/// domain record, so the conversion is infallible.
#[derive(Debug, Clone, FromRow)]
pub struct StepRow {
    pub session_id: DbId,
    pub step_name: String,
    pub form_data: serde_json::Value,
    pub signed: bool,
    pub completed_at: Timestamp,
}

impl From<StepRow> for StepRecord {
    fn from(row: StepRow) -> StepRecord {
        StepRecord {
            session_id: row.session_id,
            step_name: row.step_name,
            form_data: row.form_data,
            signed: row.signed,
            completed_at: row.completed_at,
        }
    }
}
