//! Latest-wins deduplication of validated company records.
//!
//! Records are grouped by registration id. Each group keeps the record with
//! the newest `updated_on`; among records sharing the newest date the first
//! one encountered wins. Groups come out in order of first appearance.

use indexmap::IndexMap;

use crate::record::ValidatedRecord;
use crate::types::{parse_update_date, UpdateDate};

/// The deduplicator met an update date it could not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DedupError {
    #[error("company {registration_id}: update date \"{value}\" is not a YYYY-MM-DD date")]
    DateFormat {
        registration_id: String,
        value: String,
    },
}

/// A registration id that appeared more than once in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub registration_id: String,
    /// Number of records sharing the id, including the survivor.
    pub size: usize,
    /// Update date of the surviving record.
    pub kept_date: UpdateDate,
}

/// Survivors of deduplication plus what was collapsed to get them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub survivors: Vec<ValidatedRecord>,
    pub duplicate_groups: Vec<DuplicateGroup>,
}

impl DedupReport {
    /// Records dropped because a newer (or equally new, earlier) one shared
    /// their registration id.
    pub fn dropped(&self) -> usize {
        self.duplicate_groups.iter().map(|g| g.size - 1).sum()
    }
}

/// Keep the most recently updated record per registration id.
pub fn dedupe_by_latest(
    records: Vec<ValidatedRecord>,
) -> Result<Vec<ValidatedRecord>, DedupError> {
    dedupe_with_report(records).map(|report| report.survivors)
}

/// Like [`dedupe_by_latest`], also describing every duplicate group.
///
/// Every date is parsed before anything is selected, so a single malformed
/// date fails the whole step.
pub fn dedupe_with_report(records: Vec<ValidatedRecord>) -> Result<DedupReport, DedupError> {
    let mut groups: IndexMap<String, Vec<(UpdateDate, ValidatedRecord)>> = IndexMap::new();

    for record in records {
        let date = parse_update_date(&record.updated_on).ok_or_else(|| {
            tracing::error!(
                registration_id = %record.registration_id,
                value = %record.updated_on,
                "Unparseable update date"
            );
            DedupError::DateFormat {
                registration_id: record.registration_id.clone(),
                value: record.updated_on.clone(),
            }
        })?;
        groups
            .entry(record.registration_id.clone())
            .or_default()
            .push((date, record));
    }

    let mut report = DedupReport {
        survivors: Vec::with_capacity(groups.len()),
        duplicate_groups: Vec::new(),
    };

    for (registration_id, members) in groups {
        let size = members.len();
        let Some((kept_date, survivor)) = newest(members) else {
            continue;
        };

        if size > 1 {
            tracing::warn!(
                registration_id = %registration_id,
                records = size,
                kept_date = %kept_date,
                "Found duplicate records with registration id {registration_id}"
            );
            report.duplicate_groups.push(DuplicateGroup {
                registration_id,
                size,
                kept_date,
            });
        }
        report.survivors.push(survivor);
    }

    Ok(report)
}

/// First member with the maximal date.
fn newest(
    members: Vec<(UpdateDate, ValidatedRecord)>,
) -> Option<(UpdateDate, ValidatedRecord)> {
    members.into_iter().reduce(|best, candidate| {
        if candidate.0 > best.0 {
            candidate
        } else {
            best
        }
    })
}
