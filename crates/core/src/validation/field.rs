//! Field-level rules: presence, fixed digit count, calendar date.

use crate::record::Field;
use crate::types::{parse_update_date, UpdateDate};

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field \"{field}\" is missing")]
    MissingField { field: Field },

    #[error("field \"{field}\" ({value}) must consist of {expected} digits")]
    WrongLength {
        field: Field,
        value: String,
        expected: usize,
    },

    #[error("field \"{field}\" ({value}) must consist of {expected} digits")]
    NonDigit {
        field: Field,
        value: String,
        expected: usize,
    },

    #[error("field \"{field}\" ({value}) is not a YYYY-MM-DD date")]
    InvalidDate { field: Field, value: String },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::MissingField { field }
            | Self::WrongLength { field, .. }
            | Self::NonDigit { field, .. }
            | Self::InvalidDate { field, .. } => *field,
        }
    }
}

/// Check one field value.
///
/// Absent values always fail. With `expected_digits`, the value must also be
/// exactly that many characters long and every character an ASCII digit.
pub fn check_field(
    value: Option<&str>,
    field: Field,
    expected_digits: Option<usize>,
) -> Result<(), ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { field })?;

    if let Some(expected) = expected_digits {
        if value.chars().count() != expected {
            return Err(ValidationError::WrongLength {
                field,
                value: value.to_string(),
                expected,
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::NonDigit {
                field,
                value: value.to_string(),
                expected,
            });
        }
    }

    Ok(())
}

/// Check that a present value is a calendar date.
pub fn check_date(value: Option<&str>, field: Field) -> Result<UpdateDate, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { field })?;
    parse_update_date(value).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Boolean form of [`check_field`] that logs a warning on failure.
pub fn validate(value: Option<&str>, field: Field, expected_digits: Option<usize>) -> bool {
    match check_field(value, field, expected_digits) {
        Ok(()) => true,
        Err(err) => {
            log_violation(&err);
            false
        }
    }
}

pub(crate) fn log_violation(err: &ValidationError) {
    match err {
        ValidationError::MissingField { field } => {
            tracing::warn!(field = %field, "{err}");
        }
        ValidationError::WrongLength { field, value, .. }
        | ValidationError::NonDigit { field, value, .. }
        | ValidationError::InvalidDate { field, value } => {
            tracing::warn!(field = %field, value = %value, "{err}");
        }
    }
}
