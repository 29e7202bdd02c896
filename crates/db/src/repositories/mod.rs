//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod company_repo;
pub mod phone_repo;

pub use company_repo::{BatchInsertSummary, CompanyRepo};
pub use phone_repo::PhoneRepo;
