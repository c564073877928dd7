//! Employee entity, created exactly once per approved application.

use serde::Serialize;

use crate::application::{Application, EmploymentType, JobOffer, PayFrequency};
use crate::session::SessionStatus;
use crate::types::{DbId, Timestamp};

/// An employee record. Created synchronously when an application is
/// approved; never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: DbId,
    /// Back-reference to the originating application (unique per employee).
    pub application_id: DbId,
    pub property_id: DbId,
    pub manager_id: DbId,
    pub department: String,
    pub position: String,
    pub hire_date: chrono::NaiveDate,
    pub pay_rate: f64,
    pub pay_frequency: PayFrequency,
    pub employment_type: EmploymentType,
    /// Mirror of the onboarding session status, maintained by the
    /// session manager. The session row is the source of truth.
    pub onboarding_status: SessionStatus,
    /// Snapshot of the applicant profile at approval time.
    pub personal_info: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Employee {
    /// Build a new employee from an approved application and its offer.
    pub fn from_offer(application: &Application, reviewer_id: DbId, offer: &JobOffer) -> Employee {
        let now = chrono::Utc::now();
        Employee {
            id: uuid::Uuid::new_v4(),
            application_id: application.id,
            property_id: application.property_id,
            manager_id: offer.manager_id.unwrap_or(reviewer_id),
            department: application.department.clone(),
            position: application.position.clone(),
            hire_date: offer.hire_date,
            pay_rate: offer.pay_rate,
            pay_frequency: offer.pay_frequency,
            employment_type: offer.employment_type,
            onboarding_status: SessionStatus::NotStarted,
            personal_info: serde_json::to_value(&application.applicant)
                .unwrap_or(serde_json::Value::Null),
            created_at: now,
            updated_at: now,
        }
    }
}
