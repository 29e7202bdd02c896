//! Company entity model and insert DTO.

use regimport_core::error::CoreError;
use regimport_core::record::{Field, ValidatedRecord};
use regimport_core::types::{DbId, Timestamp, UpdateDate, REGISTRATION_ID_DIGITS, TAX_ID_DIGITS};
use regimport_core::validation::field::check_date;
use regimport_core::validation::ValidationError;
use sqlx::FromRow;

/// A row from the `company` table.
///
/// The NUMERIC key columns are read back through a `::BIGINT` cast; both fit
/// comfortably in an `i64`.
#[derive(Debug, Clone, FromRow)]
pub struct Company {
    pub id: DbId,
    pub registration_id: i64,
    pub tax_id: i64,
    pub name: Option<String>,
    pub updated_on: UpdateDate,
    /// When the import wrote the row.
    pub created_at: Timestamp,
}

/// DTO for inserting a company together with its phones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub registration_id: i64,
    pub tax_id: i64,
    pub name: Option<String>,
    pub updated_on: UpdateDate,
    pub phones: Vec<String>,
}

impl TryFrom<&ValidatedRecord> for NewCompany {
    type Error = CoreError;

    fn try_from(record: &ValidatedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            registration_id: parse_digits(
                &record.registration_id,
                Field::RegistrationId,
                REGISTRATION_ID_DIGITS,
            )?,
            tax_id: parse_digits(&record.tax_id, Field::TaxId, TAX_ID_DIGITS)?,
            name: record.name.clone(),
            updated_on: check_date(Some(&record.updated_on), Field::UpdatedOn)?,
            phones: record.phones.clone(),
        })
    }
}

fn parse_digits(value: &str, field: Field, expected: usize) -> Result<i64, ValidationError> {
    value.parse().map_err(|_| ValidationError::NonDigit {
        field,
        value: value.to_string(),
        expected,
    })
}
