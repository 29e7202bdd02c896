//! Company register import: read a register export, validate and
//! deduplicate its companies, and after confirmation write them to
//! PostgreSQL in one transaction.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod sink;
