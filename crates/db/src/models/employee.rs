//! Employee row model.

use sqlx::FromRow;

use innboard_core::application::{EmploymentType, PayFrequency};
use innboard_core::employee::Employee;
use innboard_core::error::CoreError;
use innboard_core::session::SessionStatus;
use innboard_core::types::{DbId, Timestamp};

/// An employee row from the `employees` table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: DbId,
    pub application_id: DbId,
    pub property_id: DbId,
    pub manager_id: DbId,
    pub department: String,
    pub position: String,
    pub hire_date: chrono::NaiveDate,
    pub pay_rate: f64,
    pub pay_frequency: String,
    pub employment_type: String,
    pub onboarding_status: String,
    pub personal_info: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = CoreError;

    fn try_from(row: EmployeeRow) -> Result<Employee, CoreError> {
        let pay_frequency = PayFrequency::parse(&row.pay_frequency)
            .ok_or_else(|| CoreError::Store(format!("unknown pay frequency '{}'", row.pay_frequency)))?;
        let employment_type = EmploymentType::parse(&row.employment_type).ok_or_else(|| {
            CoreError::Store(format!("unknown employment type '{}'", row.employment_type))
        })?;
        let onboarding_status = SessionStatus::parse(&row.onboarding_status).ok_or_else(|| {
            CoreError::Store(format!(
                "unknown onboarding status '{}'",
                row.onboarding_status
            ))
        })?;

        Ok(Employee {
            id: row.id,
            application_id: row.application_id,
            property_id: row.property_id,
            manager_id: row.manager_id,
            department: row.department,
            position: row.position,
            hire_date: row.hire_date,
            pay_rate: row.pay_rate,
            pay_frequency,
            employment_type,
            onboarding_status,
            personal_info: row.personal_info,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
