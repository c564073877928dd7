//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return `sqlx::Error`.
//! Error classification into domain errors happens in [`crate::store`].

pub mod application_repo;
pub mod employee_repo;
pub mod session_repo;
pub mod step_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use employee_repo::EmployeeRepo;
pub use session_repo::SessionRepo;
pub use step_repo::StepRepo;
pub use user_repo::UserRepo;
