//! Pure domain logic for the company register import.
//!
//! Everything here is synchronous and free of database access: the document
//! reader that turns an XML batch into [`record::RawRecord`]s, the field and
//! record validators, and the latest-wins deduplicator.

pub mod dedup;
pub mod document;
pub mod error;
pub mod record;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_log;
