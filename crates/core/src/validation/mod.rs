//! Record validation.
//!
//! [`field`] holds the single-field rules, [`record`] applies them to the
//! required fields of whole records. Both are pure and report failures as
//! values plus a `warn` log line; nothing here aborts a batch.

pub mod field;
pub mod record;

pub use field::{check_field, validate, ValidationError};
pub use record::{filter_valid, DatePolicy, RecordValidator};
