//! Innboard domain logic.
//!
//! The application/onboarding lifecycle: job-application submission and
//! review, competing-applicant resolution, token-gated onboarding
//! sessions, and per-step completion tracking. Persistence goes through
//! the [`store::RecordStore`] trait; this crate ships the in-memory
//! implementation, `innboard-db` the PostgreSQL one.

pub mod application;
pub mod employee;
pub mod error;
pub mod fingerprint;
pub mod lifecycle;
pub mod memory;
pub mod onboarding;
pub mod resolver;
pub mod session;
pub mod steps;
pub mod store;
pub mod tracker;
pub mod types;
