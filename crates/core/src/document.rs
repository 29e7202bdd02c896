//! Register export document reader.
//!
//! The document is XML: every element child of the root is one company, and
//! every element child of a company is one field. Field elements are named by
//! the register export tags (see [`Field::document_tag`]) or by the plain
//! field names. The phone tag may repeat; every other field is scalar and
//! keeps its last occurrence.

use std::path::{Path, PathBuf};

use crate::record::{Field, RawRecord};

/// Default file name looked up in the working directory.
pub const DEFAULT_DOCUMENT_NAME: &str = "companies.xml";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Read and parse the document at `path`.
pub fn load_companies(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, DocumentError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_companies(&text)?;
    tracing::info!(path = %path.display(), companies = records.len(), "Loaded companies");
    Ok(records)
}

/// Parse a document into raw records, one per company element, in order.
pub fn parse_companies(xml: &str) -> Result<Vec<RawRecord>, DocumentError> {
    let doc = roxmltree::Document::parse(xml)?;

    let records = doc
        .root_element()
        .children()
        .filter(|node| node.is_element())
        .map(read_company)
        .collect();
    Ok(records)
}

fn read_company(company: roxmltree::Node<'_, '_>) -> RawRecord {
    let mut record = RawRecord::default();

    for child in company.children().filter(|node| node.is_element()) {
        let tag = child.tag_name().name();
        let Some(field) = Field::from_tag(tag) else {
            tracing::debug!(tag, "Ignoring unknown company field");
            continue;
        };

        let value = child.text().map(str::trim).filter(|text| !text.is_empty());
        match (field, value) {
            (Field::Phone, Some(phone)) => record.push_phone(phone),
            (Field::Phone, None) => {
                tracing::warn!(tag, "Skipping empty phone element");
            }
            (field, value) => record.set_scalar(field, value.map(String::from)),
        }
    }

    record
}
