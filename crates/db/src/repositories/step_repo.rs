//! Repository for the `onboarding_steps` table.

use sqlx::PgPool;

use innboard_core::steps::StepRecord;
use innboard_core::types::DbId;

use crate::models::step::StepRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "session_id, step_name, form_data, signed, completed_at";

/// Provides row access for per-session step records.
pub struct StepRepo;

impl StepRepo {
    /// Insert or overwrite the record for `(session_id, step_name)`.
    pub async fn upsert(pool: &PgPool, record: &StepRecord) -> Result<StepRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboarding_steps \
                 (session_id, step_name, form_data, signed, completed_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (session_id, step_name) DO UPDATE SET \
                 form_data = EXCLUDED.form_data, \
                 signed = EXCLUDED.signed, \
                 completed_at = EXCLUDED.completed_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StepRow>(&query)
            .bind(record.session_id)
            .bind(&record.step_name)
            .bind(&record.form_data)
            .bind(record.signed)
            .bind(record.completed_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        session_id: DbId,
        step_name: &str,
    ) -> Result<Option<StepRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_steps \
             WHERE session_id = $1 AND step_name = $2"
        );
        sqlx::query_as::<_, StepRow>(&query)
            .bind(session_id)
            .bind(step_name)
            .fetch_optional(pool)
            .await
    }

    /// All steps recorded for a session, in completion order.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<StepRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_steps \
             WHERE session_id = $1 ORDER BY completed_at"
        );
        sqlx::query_as::<_, StepRow>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
