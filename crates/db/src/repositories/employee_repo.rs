//! Repository for the `employees` table.

use sqlx::PgPool;

use innboard_core::employee::Employee;
use innboard_core::types::DbId;

use crate::models::employee::EmployeeRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, application_id, property_id, manager_id, department, position, \
    hire_date, pay_rate, pay_frequency, employment_type, onboarding_status, \
    personal_info, created_at, updated_at";

/// Provides row access for employee records.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row.
    ///
    /// Violating `uq_employees_application_id` surfaces as a database
    /// error with code 23505.
    pub async fn insert(pool: &PgPool, employee: &Employee) -> Result<EmployeeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees \
                 (id, application_id, property_id, manager_id, department, position, \
                  hire_date, pay_rate, pay_frequency, employment_type, \
                  onboarding_status, personal_info, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(employee.id)
            .bind(employee.application_id)
            .bind(employee.property_id)
            .bind(employee.manager_id)
            .bind(&employee.department)
            .bind(&employee.position)
            .bind(employee.hire_date)
            .bind(employee.pay_rate)
            .bind(employee.pay_frequency.as_str())
            .bind(employee.employment_type.as_str())
            .bind(employee.onboarding_status.as_str())
            .bind(&employee.personal_info)
            .bind(employee.created_at)
            .bind(employee.updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EmployeeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Option<EmployeeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE application_id = $1");
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    /// Mirror an onboarding status change. Returns `true` if a row was
    /// updated.
    pub async fn set_onboarding_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE employees SET onboarding_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
