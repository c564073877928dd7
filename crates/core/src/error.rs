//! Domain error taxonomy.
//!
//! Every recoverable condition the lifecycle managers can produce is a
//! distinct variant, so the HTTP layer can map each one to the correct
//! user-facing behaviour instead of collapsing them into a generic failure.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced application, session, or step does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The requested state change is illegal from the current state.
    /// `current` carries the actual status so callers can report it.
    #[error("Cannot {action} {entity} {id}: current status is '{current}'")]
    InvalidTransition {
        entity: &'static str,
        id: DbId,
        action: &'static str,
        current: String,
    },

    /// A new submission collides with an existing pending application
    /// sharing the same (email, property, position) fingerprint.
    #[error("An application for this position is already in progress")]
    DuplicatePending,

    /// The actor lacks authority over the target property or application.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The onboarding session is past its expiration.
    #[error("Onboarding session has expired; request a new invitation")]
    Expired,

    /// The step name is not in the configured step set.
    #[error("Unknown onboarding step '{0}'")]
    InvalidStep(String),

    /// A signature was submitted for a step with no form data.
    #[error("Cannot sign step '{0}' before submitting its form data")]
    MissingFormData(String),

    /// Input failed validation before reaching a state machine.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness or concurrent-write conflict outside the duplicate-
    /// pending rule (e.g. two employees for one application).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The record store failed. Message is already sanitized.
    #[error("Storage error: {0}")]
    Store(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with a UUID id.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
