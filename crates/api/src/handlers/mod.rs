//! HTTP handlers, grouped by surface: reviewer-facing application
//! endpoints, token-gated onboarding endpoints, and manager-side session
//! transitions.

pub mod applications;
pub mod onboarding;
pub mod sessions;
