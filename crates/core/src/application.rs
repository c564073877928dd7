//! Job application entity and its lifecycle state machine.
//!
//! The status enum is closed and every legal transition is listed in one
//! table ([`ApplicationStatus::apply`]). Nothing else in the codebase is
//! allowed to decide whether a transition is legal.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted, awaiting a reviewer decision. The only initial state.
    Pending,
    /// Accepted by a reviewer. Terminal.
    Approved,
    /// Declined by a reviewer. Terminal.
    Rejected,
    /// Not selected for this opening; eligible for reactivation.
    TalentPool,
    /// Applicant-initiated withdrawal. Terminal.
    Withdrawn,
}

/// Reviewer (or applicant) actions that drive application transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
    MoveToTalentPool,
    Reactivate,
    Withdraw,
}

impl ReviewAction {
    /// Human-readable verb used in error messages and logs.
    pub fn verb(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::MoveToTalentPool => "move to talent pool",
            ReviewAction::Reactivate => "reactivate",
            ReviewAction::Withdraw => "withdraw",
        }
    }
}

impl ApplicationStatus {
    /// The transition table: `from-state x action -> to-state`.
    ///
    /// Returns `None` for every combination not listed, which callers
    /// surface as [`CoreError::InvalidTransition`]. `talent_pool` is
    /// reachable only from `pending`; reactivation is the sole way out.
    pub fn apply(self, action: ReviewAction) -> Option<ApplicationStatus> {
        use ApplicationStatus::*;
        match (self, action) {
            (Pending, ReviewAction::Approve) => Some(Approved),
            (Pending, ReviewAction::Reject) => Some(Rejected),
            (Pending, ReviewAction::MoveToTalentPool) => Some(TalentPool),
            (Pending, ReviewAction::Withdraw) => Some(Withdrawn),
            (TalentPool, ReviewAction::Reactivate) => Some(Pending),
            _ => None,
        }
    }

    /// Whether no further reviewer action can move this application.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::TalentPool => "talent_pool",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Parse a stored status string. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<ApplicationStatus> {
        match value {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            "talent_pool" => Some(ApplicationStatus::TalentPool),
            "withdrawn" => Some(ApplicationStatus::Withdrawn),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Structured applicant record captured at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicantProfile {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-form employment history, availability, and similar detail
    /// captured by the application form.
    #[serde(default)]
    pub details: serde_json::Value,
}

/// A job application. Never deleted; kept for audit in every status.
#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: DbId,
    pub property_id: DbId,
    pub department: String,
    pub position: String,
    pub applicant: ApplicantProfile,
    pub status: ApplicationStatus,
    /// Duplicate-detection fingerprint (see [`crate::fingerprint`]).
    pub fingerprint: String,
    pub applied_at: Timestamp,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub talent_pool_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub rejection_feedback: Option<String>,
}

impl Application {
    /// Error for an action that is illegal from the current status.
    pub fn invalid_transition(&self, action: ReviewAction) -> CoreError {
        CoreError::InvalidTransition {
            entity: "application",
            id: self.id,
            action: action.verb(),
            current: self.status.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for submitting a new application.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitApplication {
    pub property_id: DbId,
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "position is required"))]
    pub position: String,
    #[validate(nested)]
    pub applicant: ApplicantProfile,
}

/// How often the employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl PayFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::Biweekly => "biweekly",
            PayFrequency::Monthly => "monthly",
        }
    }

    pub fn parse(value: &str) -> Option<PayFrequency> {
        match value {
            "weekly" => Some(PayFrequency::Weekly),
            "biweekly" => Some(PayFrequency::Biweekly),
            "monthly" => Some(PayFrequency::Monthly),
            _ => None,
        }
    }
}

/// Employment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Temporary,
}

impl EmploymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
            EmploymentType::Temporary => "temporary",
        }
    }

    pub fn parse(value: &str) -> Option<EmploymentType> {
        match value {
            "full_time" => Some(EmploymentType::FullTime),
            "part_time" => Some(EmploymentType::PartTime),
            "temporary" => Some(EmploymentType::Temporary),
            _ => None,
        }
    }
}

/// Job offer details attached to an approval.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobOffer {
    pub hire_date: chrono::NaiveDate,
    #[validate(range(min = 0.01, message = "pay rate must be positive"))]
    pub pay_rate: f64,
    pub pay_frequency: PayFrequency,
    pub employment_type: EmploymentType,
    /// Supervising manager for the new hire. Defaults to the reviewer.
    #[serde(default)]
    pub manager_id: Option<DbId>,
}

/// Input for rejecting an application.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RejectApplication {
    #[validate(length(min = 1, message = "a rejection reason is required"))]
    pub reason: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

// ---------------------------------------------------------------------------
// Patch / filter
// ---------------------------------------------------------------------------

/// Partial update applied by the record store. `None` fields are left
/// untouched; double-option fields distinguish "leave" from "set null".
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub reviewed_by: Option<Option<DbId>>,
    pub reviewed_at: Option<Option<Timestamp>>,
    pub talent_pool_at: Option<Option<Timestamp>>,
    pub rejection_reason: Option<Option<String>>,
    pub rejection_feedback: Option<Option<String>>,
}

/// Query filter for application listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationFilter {
    pub property_id: Option<DbId>,
    pub position: Option<String>,
    pub status: Option<ApplicationStatus>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;
    use ReviewAction::*;

    #[test]
    fn pending_admits_all_reviewer_actions_except_reactivate() {
        assert_eq!(Pending.apply(Approve), Some(Approved));
        assert_eq!(Pending.apply(Reject), Some(Rejected));
        assert_eq!(Pending.apply(MoveToTalentPool), Some(TalentPool));
        assert_eq!(Pending.apply(Withdraw), Some(Withdrawn));
        assert_eq!(Pending.apply(Reactivate), None);
    }

    #[test]
    fn talent_pool_admits_only_reactivation() {
        assert_eq!(TalentPool.apply(Reactivate), Some(Pending));
        assert_eq!(TalentPool.apply(Approve), None);
        assert_eq!(TalentPool.apply(Reject), None);
        assert_eq!(TalentPool.apply(MoveToTalentPool), None);
        assert_eq!(TalentPool.apply(Withdraw), None);
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for status in [Approved, Rejected, Withdrawn] {
            for action in [Approve, Reject, MoveToTalentPool, Reactivate, Withdraw] {
                assert_eq!(status.apply(action), None, "{status} must not admit {action:?}");
            }
        }
    }

    #[test]
    fn terminality_matches_table() {
        assert!(Approved.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(Withdrawn.is_terminal());
        assert!(!Pending.is_terminal());
        // Talent pool is reactivatable, so not terminal.
        assert!(!TalentPool.is_terminal());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [Pending, Approved, Rejected, TalentPool, Withdrawn] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("unknown"), None);
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&TalentPool).unwrap();
        assert_eq!(json, "\"talent_pool\"");
    }

    #[test]
    fn applicant_profile_requires_valid_email() {
        let profile = ApplicantProfile {
            first_name: "Ada".into(),
            last_name: "Li".into(),
            email: "not-an-email".into(),
            phone: None,
            details: serde_json::Value::Null,
        };
        assert!(validator::Validate::validate(&profile).is_err());
    }
}
