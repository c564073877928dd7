//! Onboarding session entity, status state machine, and access tokens.
//!
//! A session is the token-addressable, time-limited workspace in which an
//! approved hire completes onboarding steps. The token is the sole
//! employee-side credential; only its SHA-256 hash is persisted, and the
//! plaintext is returned exactly once at creation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fingerprint::sha256_hex;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of the generated session token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

/// Default session lifetime for freshly approved applications.
pub const DEFAULT_EXPIRY_HOURS: i64 = 72;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an onboarding session. The employee record's
/// `onboarding_status` mirrors this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created, token never resolved.
    NotStarted,
    /// Token resolved at least once; employee is filling in steps.
    InProgress,
    /// Employee declared their side done.
    EmployeeCompleted,
    /// Manager is reviewing and completing manager-side steps.
    ManagerReview,
    /// All done. Terminal.
    Completed,
    /// Clock passed `expires_at` before completion. Terminal.
    Expired,
}

/// Actions that drive session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// First successful token resolution.
    Start,
    EmployeeComplete,
    BeginManagerReview,
    Complete,
    /// Lazy expiry, legal from any non-terminal state.
    Expire,
}

impl SessionAction {
    pub fn verb(self) -> &'static str {
        match self {
            SessionAction::Start => "start",
            SessionAction::EmployeeComplete => "mark employee-complete",
            SessionAction::BeginManagerReview => "begin manager review",
            SessionAction::Complete => "complete",
            SessionAction::Expire => "expire",
        }
    }
}

impl SessionStatus {
    /// The transition table: `from-state x action -> to-state`.
    pub fn apply(self, action: SessionAction) -> Option<SessionStatus> {
        use SessionStatus::*;
        match (self, action) {
            (NotStarted, SessionAction::Start) => Some(InProgress),
            (InProgress, SessionAction::EmployeeComplete) => Some(EmployeeCompleted),
            (EmployeeCompleted, SessionAction::BeginManagerReview) => Some(ManagerReview),
            (ManagerReview, SessionAction::Complete) => Some(Completed),
            (from, SessionAction::Expire) if !from.is_terminal() => Some(Expired),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Expired)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "not_started",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::EmployeeCompleted => "employee_completed",
            SessionStatus::ManagerReview => "manager_review",
            SessionStatus::Completed => "completed",
            SessionStatus::Expired => "expired",
        }
    }

    /// Parse a stored status string. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<SessionStatus> {
        match value {
            "not_started" => Some(SessionStatus::NotStarted),
            "in_progress" => Some(SessionStatus::InProgress),
            "employee_completed" => Some(SessionStatus::EmployeeCompleted),
            "manager_review" => Some(SessionStatus::ManagerReview),
            "completed" => Some(SessionStatus::Completed),
            "expired" => Some(SessionStatus::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A token-gated onboarding session tied to one employee.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingSession {
    pub id: DbId,
    pub employee_id: DbId,
    pub application_id: DbId,
    pub property_id: DbId,
    pub manager_id: DbId,
    /// SHA-256 hex digest of the access token. The plaintext is never stored.
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub status: SessionStatus,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OnboardingSession {
    /// Whether the clock has passed expiry. Checked lazily on access;
    /// applies regardless of the stored status.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Error for an action that is illegal from the current status.
    pub fn invalid_transition(&self, action: SessionAction) -> CoreError {
        CoreError::InvalidTransition {
            entity: "onboarding session",
            id: self.id,
            action: action.verb(),
            current: self.status.as_str().to_string(),
        }
    }
}

/// Partial update applied by the record store.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub expires_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// The result of generating a new session token.
pub struct GeneratedToken {
    /// The plaintext token (returned to the caller exactly once).
    pub plaintext: String,
    /// The SHA-256 hex digest stored alongside the session.
    pub hash: String,
}

/// Generate a new unguessable session token.
pub fn generate_token() -> GeneratedToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();

    let hash = hash_token(&plaintext);

    GeneratedToken { plaintext, hash }
}

/// Compute the stored digest of a presented token.
pub fn hash_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use SessionAction::*;
    use SessionStatus::*;

    #[test]
    fn happy_path_transitions_in_order() {
        assert_eq!(NotStarted.apply(Start), Some(InProgress));
        assert_eq!(InProgress.apply(EmployeeComplete), Some(EmployeeCompleted));
        assert_eq!(
            EmployeeCompleted.apply(BeginManagerReview),
            Some(ManagerReview)
        );
        assert_eq!(ManagerReview.apply(Complete), Some(Completed));
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert_eq!(NotStarted.apply(EmployeeComplete), None);
        assert_eq!(NotStarted.apply(Complete), None);
        assert_eq!(InProgress.apply(BeginManagerReview), None);
        assert_eq!(InProgress.apply(Complete), None);
        assert_eq!(EmployeeCompleted.apply(Complete), None);
    }

    #[test]
    fn expire_reaches_every_non_terminal_state() {
        for status in [NotStarted, InProgress, EmployeeCompleted, ManagerReview] {
            assert_eq!(status.apply(Expire), Some(Expired));
        }
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for status in [Completed, Expired] {
            for action in [Start, EmployeeComplete, BeginManagerReview, Complete, Expire] {
                assert_eq!(status.apply(action), None);
            }
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            NotStarted,
            InProgress,
            EmployeeCompleted,
            ManagerReview,
            Completed,
            Expired,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("bogus"), None);
    }

    #[test]
    fn generated_token_has_expected_shape() {
        let token = generate_token();
        assert_eq!(token.plaintext.len(), TOKEN_LENGTH);
        assert!(token.plaintext.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(token.hash.len(), 64);
        assert_eq!(token.hash, hash_token(&token.plaintext));
    }

    #[test]
    fn different_tokens_produce_different_hashes() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a.plaintext, b.plaintext);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn expiry_check_is_strict() {
        let now = chrono::Utc::now();
        let session = OnboardingSession {
            id: uuid::Uuid::new_v4(),
            employee_id: uuid::Uuid::new_v4(),
            application_id: uuid::Uuid::new_v4(),
            property_id: uuid::Uuid::new_v4(),
            manager_id: uuid::Uuid::new_v4(),
            token_hash: String::new(),
            status: InProgress,
            expires_at: now,
            created_at: now,
            updated_at: now,
        };
        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + chrono::Duration::seconds(1)));
    }
}
