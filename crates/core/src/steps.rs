//! Onboarding step registry and progress arithmetic.
//!
//! The set of steps, which are required, and which belong to the manager
//! side are configuration, not state-machine logic. The default registry
//! is the standard hotel onboarding packet.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Step name constants (default registry)
// ---------------------------------------------------------------------------

pub const STEP_WELCOME: &str = "welcome";
pub const STEP_PERSONAL_INFO: &str = "personal_info";
pub const STEP_I9_SECTION1: &str = "i9_section1";
/// Employer attestation; completed by the manager, not the employee.
pub const STEP_I9_SECTION2: &str = "i9_section2";
pub const STEP_W4: &str = "w4";
pub const STEP_DIRECT_DEPOSIT: &str = "direct_deposit";
pub const STEP_HEALTH_INSURANCE: &str = "health_insurance";
pub const STEP_COMPANY_POLICIES: &str = "company_policies";

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One named unit of onboarding work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    pub name: String,
    /// Required steps count toward the progress percentage.
    pub required: bool,
    /// Manager-side steps gate session completion, not employee progress.
    pub manager_side: bool,
}

impl StepDefinition {
    fn new(name: &str, required: bool, manager_side: bool) -> Self {
        StepDefinition {
            name: name.to_string(),
            required,
            manager_side,
        }
    }
}

/// The configured step set for a deployment.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

impl Default for StepRegistry {
    fn default() -> Self {
        StepRegistry::standard()
    }
}

impl StepRegistry {
    /// The standard hotel onboarding packet.
    pub fn standard() -> Self {
        StepRegistry {
            steps: vec![
                StepDefinition::new(STEP_WELCOME, true, false),
                StepDefinition::new(STEP_PERSONAL_INFO, true, false),
                StepDefinition::new(STEP_I9_SECTION1, true, false),
                StepDefinition::new(STEP_W4, true, false),
                StepDefinition::new(STEP_DIRECT_DEPOSIT, true, false),
                StepDefinition::new(STEP_HEALTH_INSURANCE, false, false),
                StepDefinition::new(STEP_COMPANY_POLICIES, true, false),
                StepDefinition::new(STEP_I9_SECTION2, true, true),
            ],
        }
    }

    /// Build a registry from an explicit step list.
    pub fn new(steps: Vec<StepDefinition>) -> Self {
        StepRegistry { steps }
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Look up a step definition by name.
    pub fn definition(&self, name: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Validate that a step name belongs to the registry.
    pub fn validate_step(&self, name: &str) -> Result<&StepDefinition, CoreError> {
        self.definition(name)
            .ok_or_else(|| CoreError::InvalidStep(name.to_string()))
    }

    /// Names of required employee-side steps (the progress denominator).
    pub fn required_employee_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.required && !s.manager_side)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Names of required manager-side steps (the completion gate).
    pub fn required_manager_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.required && s.manager_side)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Progress percentage given the set of completed step names.
    ///
    /// Counts required employee-side steps only and rounds down, so the
    /// value only reaches 100 when every required step is recorded.
    pub fn progress_percentage(&self, completed: &[String]) -> u8 {
        let required = self.required_employee_steps();
        if required.is_empty() {
            return 100;
        }
        let done = required
            .iter()
            .filter(|name| completed.iter().any(|c| c == *name))
            .count();
        ((done * 100) / required.len()) as u8
    }
}

// ---------------------------------------------------------------------------
// Step record
// ---------------------------------------------------------------------------

/// Per-step completion state within a session. One row per
/// `(session_id, step_name)`; re-submission overwrites in place.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub session_id: DbId,
    pub step_name: String,
    pub form_data: serde_json::Value,
    /// True iff the most recent submission carried signature data.
    pub signed: bool,
    pub completed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
