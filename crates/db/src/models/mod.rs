//! Row structs matching the database schema.
//!
//! Each submodule contains a `FromRow` struct per table plus a `TryFrom`
//! conversion into the corresponding domain entity. Conversions fail only
//! when a stored enum string is unknown, which indicates schema drift.

pub mod application;
pub mod employee;
pub mod session;
pub mod step;
pub mod user;
