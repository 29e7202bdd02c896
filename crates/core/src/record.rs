//! Company records as they move through the import pipeline.
//!
//! A [`RawRecord`] is exactly what the document reader saw. A
//! [`ValidatedRecord`] is one that passed the required-field checks, so its
//! key fields are no longer optional.

use std::fmt;

// ── Fields ───────────────────────────────────────────────────────────

/// A field of a company record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RegistrationId,
    TaxId,
    Name,
    UpdatedOn,
    Phone,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegistrationId => "registration_id",
            Self::TaxId => "tax_id",
            Self::Name => "name",
            Self::UpdatedOn => "updated_on",
            Self::Phone => "phone",
        }
    }

    /// Tag used for this field in register export documents.
    pub fn document_tag(&self) -> &'static str {
        match self {
            Self::RegistrationId => "ОГРН",
            Self::TaxId => "ИНН",
            Self::Name => "НазваниеКомпании",
            Self::UpdatedOn => "ДатаОбн",
            Self::Phone => "Телефон",
        }
    }

    /// Resolve a document element name to a field.
    ///
    /// Accepts both the register export tag and the snake_case field name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        [
            Self::RegistrationId,
            Self::TaxId,
            Self::Name,
            Self::UpdatedOn,
            Self::Phone,
        ]
        .into_iter()
        .find(|field| field.document_tag() == tag || field.as_str() == tag)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Records ──────────────────────────────────────────────────────────

/// A company record as read from the input document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub registration_id: Option<String>,
    pub tax_id: Option<String>,
    pub name: Option<String>,
    pub updated_on: Option<String>,
    /// Phone numbers in document order.
    pub phones: Vec<String>,
}

impl RawRecord {
    /// Value of a scalar field. Always `None` for [`Field::Phone`].
    pub fn scalar(&self, field: Field) -> Option<&str> {
        match field {
            Field::RegistrationId => self.registration_id.as_deref(),
            Field::TaxId => self.tax_id.as_deref(),
            Field::Name => self.name.as_deref(),
            Field::UpdatedOn => self.updated_on.as_deref(),
            Field::Phone => None,
        }
    }

    /// Set a scalar field, replacing any previous value. Phones go through
    /// [`RawRecord::push_phone`].
    pub fn set_scalar(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::RegistrationId => self.registration_id = value,
            Field::TaxId => self.tax_id = value,
            Field::Name => self.name = value,
            Field::UpdatedOn => self.updated_on = value,
            Field::Phone => self.phones.extend(value),
        }
    }

    pub fn push_phone(&mut self, phone: impl Into<String>) {
        self.phones.push(phone.into());
    }
}

/// A record whose registration id, tax id and update date are present.
///
/// `registration_id` and `tax_id` are fixed-length digit strings. The update
/// date is kept as text; whether it is a real calendar date depends on the
/// validator's date policy and is settled for good by the deduplicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub registration_id: String,
    pub tax_id: String,
    pub name: Option<String>,
    pub updated_on: String,
    pub phones: Vec<String>,
}

impl ValidatedRecord {
    /// Promote a raw record whose required fields are known to be present.
    ///
    /// Returns `None` if any of them is missing.
    pub(crate) fn from_raw(raw: RawRecord) -> Option<Self> {
        Some(Self {
            registration_id: raw.registration_id?,
            tax_id: raw.tax_id?,
            name: raw.name,
            updated_on: raw.updated_on?,
            phones: raw.phones,
        })
    }
}
