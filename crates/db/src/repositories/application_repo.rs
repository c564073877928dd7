//! Repository for the `applications` table.

use sqlx::PgPool;

use innboard_core::application::{Application, ApplicationFilter, ApplicationPatch};
use innboard_core::types::DbId;

use crate::models::application::ApplicationRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, property_id, department, position, applicant, status, fingerprint, \
    applied_at, reviewed_by, reviewed_at, talent_pool_at, \
    rejection_reason, rejection_feedback";

/// Provides row access for job applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application, returning the created row.
    ///
    /// Violating `uq_applications_pending_fingerprint` surfaces as a
    /// database error with code 23505.
    pub async fn insert(
        pool: &PgPool,
        application: &Application,
    ) -> Result<ApplicationRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications \
                 (id, property_id, department, position, applicant, status, \
                  fingerprint, applied_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(application.id)
            .bind(application.property_id)
            .bind(&application.department)
            .bind(&application.position)
            .bind(serde_json::to_value(&application.applicant).unwrap_or_default())
            .bind(application.status.as_str())
            .bind(&application.fingerprint)
            .bind(application.applied_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List applications in submission order, with optional filters.
    pub async fn list(
        pool: &PgPool,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationRow>, sqlx::Error> {
        let mut clauses: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.property_id.is_some() {
            clauses.push(format!("property_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.position.is_some() {
            // Case-insensitive: "Agent" and "agent" are the same opening.
            clauses.push(format!("LOWER(position) = LOWER(${param_idx})"));
            param_idx += 1;
        }
        if filter.status.is_some() {
            clauses.push(format!("status = ${param_idx}"));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let query = format!(
            "SELECT {COLUMNS} FROM applications {where_clause} ORDER BY applied_at"
        );

        let mut q = sqlx::query_as::<_, ApplicationRow>(&query);
        if let Some(property_id) = filter.property_id {
            q = q.bind(property_id);
        }
        if let Some(ref position) = filter.position {
            q = q.bind(position.clone());
        }
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }

        q.fetch_all(pool).await
    }

    /// Apply a patch unconditionally. Returns `None` if the row is missing.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &ApplicationPatch,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        Self::patch_where(pool, id, None, patch).await
    }

    /// Apply a patch only while the row is still in `expected` status.
    /// Returns `None` when no row matched, whether missing or moved on.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        expected: &str,
        patch: &ApplicationPatch,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        Self::patch_where(pool, id, Some(expected), patch).await
    }

    /// Shared dynamic-SET builder for `update` and `transition`. The SET
    /// clause lists only the fields present in the patch; double-option
    /// fields bind NULL when the inner option is `None`.
    async fn patch_where(
        pool: &PgPool,
        id: DbId,
        expected: Option<&str>,
        patch: &ApplicationPatch,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        let mut set_clauses: Vec<String> = Vec::new();
        // $1 is id; $2 is the expected status when present.
        let mut param_idx: usize = if expected.is_some() { 3 } else { 2 };

        if patch.status.is_some() {
            set_clauses.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if patch.reviewed_by.is_some() {
            set_clauses.push(format!("reviewed_by = ${param_idx}"));
            param_idx += 1;
        }
        if patch.reviewed_at.is_some() {
            set_clauses.push(format!("reviewed_at = ${param_idx}"));
            param_idx += 1;
        }
        if patch.talent_pool_at.is_some() {
            set_clauses.push(format!("talent_pool_at = ${param_idx}"));
            param_idx += 1;
        }
        if patch.rejection_reason.is_some() {
            set_clauses.push(format!("rejection_reason = ${param_idx}"));
            param_idx += 1;
        }
        if patch.rejection_feedback.is_some() {
            set_clauses.push(format!("rejection_feedback = ${param_idx}"));
        }

        if set_clauses.is_empty() {
            let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
            return sqlx::query_as::<_, ApplicationRow>(&query)
                .bind(id)
                .fetch_optional(pool)
                .await;
        }

        let guard = if expected.is_some() {
            " AND status = $2"
        } else {
            ""
        };
        let query = format!(
            "UPDATE applications SET {} WHERE id = $1{guard} RETURNING {COLUMNS}",
            set_clauses.join(", ")
        );

        let mut q = sqlx::query_as::<_, ApplicationRow>(&query).bind(id);
        if let Some(expected) = expected {
            q = q.bind(expected);
        }
        if let Some(status) = patch.status {
            q = q.bind(status.as_str());
        }
        if let Some(reviewed_by) = patch.reviewed_by {
            q = q.bind(reviewed_by);
        }
        if let Some(reviewed_at) = patch.reviewed_at {
            q = q.bind(reviewed_at);
        }
        if let Some(talent_pool_at) = patch.talent_pool_at {
            q = q.bind(talent_pool_at);
        }
        if let Some(ref reason) = patch.rejection_reason {
            q = q.bind(reason.clone());
        }
        if let Some(ref feedback) = patch.rejection_feedback {
            q = q.bind(feedback.clone());
        }

        q.fetch_optional(pool).await
    }
}
