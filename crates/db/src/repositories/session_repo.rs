//! Repository for the `onboarding_sessions` table.

use sqlx::PgPool;

use innboard_core::session::{OnboardingSession, SessionPatch};
use innboard_core::types::DbId;

use crate::models::session::SessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, employee_id, application_id, property_id, manager_id, token_hash, \
    status, expires_at, created_at, updated_at";

/// Provides row access for onboarding sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn insert(
        pool: &PgPool,
        session: &OnboardingSession,
    ) -> Result<SessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboarding_sessions \
                 (id, employee_id, application_id, property_id, manager_id, \
                  token_hash, status, expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(session.id)
            .bind(session.employee_id)
            .bind(session.application_id)
            .bind(session.property_id)
            .bind(session.manager_id)
            .bind(&session.token_hash)
            .bind(session.status.as_str())
            .bind(session.expires_at)
            .bind(session.created_at)
            .bind(session.updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarding_sessions WHERE id = $1");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a session by the digest of a presented token. Expiry is not
    /// filtered here; the domain layer decides what an expired hit means.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<SessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarding_sessions WHERE token_hash = $1");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Apply a patch unconditionally. Returns `None` if the row is missing.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &SessionPatch,
    ) -> Result<Option<SessionRow>, sqlx::Error> {
        Self::patch_where(pool, id, None, patch).await
    }

    /// Apply a patch only while the row is still in `expected` status.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        expected: &str,
        patch: &SessionPatch,
    ) -> Result<Option<SessionRow>, sqlx::Error> {
        Self::patch_where(pool, id, Some(expected), patch).await
    }

    async fn patch_where(
        pool: &PgPool,
        id: DbId,
        expected: Option<&str>,
        patch: &SessionPatch,
    ) -> Result<Option<SessionRow>, sqlx::Error> {
        let mut set_clauses: Vec<String> = vec!["updated_at = NOW()".to_string()];
        // $1 is id; $2 is the expected status when present.
        let mut param_idx: usize = if expected.is_some() { 3 } else { 2 };

        if patch.status.is_some() {
            set_clauses.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if patch.expires_at.is_some() {
            set_clauses.push(format!("expires_at = ${param_idx}"));
        }

        let guard = if expected.is_some() {
            " AND status = $2"
        } else {
            ""
        };
        let query = format!(
            "UPDATE onboarding_sessions SET {} WHERE id = $1{guard} RETURNING {COLUMNS}",
            set_clauses.join(", ")
        );

        let mut q = sqlx::query_as::<_, SessionRow>(&query).bind(id);
        if let Some(expected) = expected {
            q = q.bind(expected);
        }
        if let Some(status) = patch.status {
            q = q.bind(status.as_str());
        }
        if let Some(expires_at) = patch.expires_at {
            q = q.bind(expires_at);
        }

        q.fetch_optional(pool).await
    }
}
