//! Whole-record validation: required fields of a company record.

use std::str::FromStr;

use crate::record::{Field, RawRecord, ValidatedRecord};
use crate::types::{REGISTRATION_ID_DIGITS, TAX_ID_DIGITS};

use super::field::{check_date, check_field, log_violation, ValidationError};

/// What to do with an `updated_on` value that is present but not a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePolicy {
    /// Reject the record here, like any other invalid field.
    #[default]
    Reject,
    /// Only check presence; the deduplicator fails the batch on a bad date.
    Abort,
}

impl DatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Abort => "abort",
        }
    }
}

impl FromStr for DatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "unknown date policy '{other}' (expected reject or abort)"
            )),
        }
    }
}

/// Applies the field rules to the required fields of each record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordValidator {
    date_policy: DatePolicy,
}

impl RecordValidator {
    pub fn new(date_policy: DatePolicy) -> Self {
        Self { date_policy }
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.date_policy
    }

    /// Run every required-field check and collect all failures.
    ///
    /// Checks never short-circuit: a record with three bad fields yields
    /// three errors.
    pub fn check(&self, record: &RawRecord) -> Vec<ValidationError> {
        let updated_on = match self.date_policy {
            DatePolicy::Reject => {
                check_date(record.scalar(Field::UpdatedOn), Field::UpdatedOn).map(|_| ())
            }
            DatePolicy::Abort => {
                check_field(record.scalar(Field::UpdatedOn), Field::UpdatedOn, None)
            }
        };

        [
            check_field(
                record.scalar(Field::RegistrationId),
                Field::RegistrationId,
                Some(REGISTRATION_ID_DIGITS),
            ),
            check_field(record.scalar(Field::TaxId), Field::TaxId, Some(TAX_ID_DIGITS)),
            updated_on,
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Validate one record, logging a warning per failed field.
    pub fn validate_record(
        &self,
        record: &RawRecord,
    ) -> Result<ValidatedRecord, Vec<ValidationError>> {
        let errors = self.check(record);
        if !errors.is_empty() {
            errors.iter().for_each(log_violation);
            return Err(errors);
        }

        ValidatedRecord::from_raw(record.clone()).ok_or_else(|| {
            // `check` has already verified presence.
            vec![ValidationError::MissingField {
                field: Field::RegistrationId,
            }]
        })
    }

    /// Keep the records that pass, in input order.
    pub fn filter_valid(&self, records: &[RawRecord]) -> Vec<ValidatedRecord> {
        let valid: Vec<ValidatedRecord> = records
            .iter()
            .filter_map(|record| self.validate_record(record).ok())
            .collect();

        tracing::debug!(
            total = records.len(),
            valid = valid.len(),
            date_policy = self.date_policy.as_str(),
            "Validated company records"
        );
        valid
    }
}

/// Keep the records whose registration id, tax id and update date pass the
/// field rules. The update date is only checked for presence.
pub fn filter_valid(records: &[RawRecord]) -> Vec<ValidatedRecord> {
    RecordValidator::new(DatePolicy::Abort).filter_valid(records)
}
