//! One import run: validate, deduplicate, confirm, persist.

use std::future::Future;
use std::io::{BufRead, Write};

use regimport_core::dedup::{dedupe_with_report, DedupReport};
use regimport_core::error::CoreError;
use regimport_core::record::{RawRecord, ValidatedRecord};
use regimport_core::validation::RecordValidator;
use regimport_db::repositories::BatchInsertSummary;
use regimport_db::PersistenceError;

use crate::error::AppResult;
use crate::sink::CompanySink;

/// Prompt shown before anything is written.
pub const CONFIRMATION_PROMPT: &str = "Duplicate companies with an older update date and \
companies with invalid data will be discarded when writing to the database. \
Do you want to continue? (y/n)";

/// How a run ended.
#[derive(Debug)]
pub enum ImportOutcome {
    /// The user did not answer `y`; nothing was written.
    Declined { discarded: usize },
    /// The whole batch was committed.
    Committed {
        discarded: usize,
        summary: BatchInsertSummary,
    },
    /// The write failed and the transaction was rolled back.
    RolledBack {
        discarded: usize,
        error: PersistenceError,
    },
}

impl ImportOutcome {
    pub fn discarded(&self) -> usize {
        match self {
            Self::Declined { discarded }
            | Self::Committed { discarded, .. }
            | Self::RolledBack { discarded, .. } => *discarded,
        }
    }
}

/// A batch ready to be written.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    /// Records read from the document.
    pub total: usize,
    /// Records that passed validation.
    pub valid: usize,
    pub dedup: DedupReport,
}

impl PreparedBatch {
    pub fn survivors(&self) -> &[ValidatedRecord] {
        &self.dedup.survivors
    }

    /// Records that will not be written: invalid ones plus older duplicates.
    pub fn discarded(&self) -> usize {
        self.total - self.dedup.survivors.len()
    }
}

/// Validate and deduplicate a batch.
///
/// Fails only if the deduplicator meets an unparseable update date, which
/// can happen under [`regimport_core::validation::DatePolicy::Abort`].
pub fn prepare(records: &[RawRecord], validator: &RecordValidator) -> AppResult<PreparedBatch> {
    let valid = validator.filter_valid(records);
    let valid_count = valid.len();
    let dedup = dedupe_with_report(valid).map_err(CoreError::from)?;

    let batch = PreparedBatch {
        total: records.len(),
        valid: valid_count,
        dedup,
    };
    tracing::info!(
        total = batch.total,
        invalid = batch.total - batch.valid,
        duplicates = batch.dedup.dropped(),
        unique = batch.survivors().len(),
        "Prepared company batch"
    );
    Ok(batch)
}

/// Print the discarded count and the prompt, then read one answer line.
///
/// Only an answer of exactly `y` confirms. End of input declines.
pub fn confirm(
    discarded: usize,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> AppResult<bool> {
    writeln!(output, "Number of invalid companies: {discarded}")?;
    writeln!(output, "{CONFIRMATION_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(&line);
    Ok(answer == "y")
}

/// Run the full import.
///
/// `open_sink` is only called after the user confirms, so a declined run
/// never touches the database. The sink is closed on every path once
/// opened.
pub async fn run_import<S, F, Fut>(
    records: &[RawRecord],
    validator: &RecordValidator,
    mut input: impl BufRead,
    output: &mut impl Write,
    open_sink: F,
) -> AppResult<ImportOutcome>
where
    S: CompanySink + Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<S>>,
{
    let batch = prepare(records, validator)?;
    let discarded = batch.discarded();

    if !confirm(discarded, &mut input, output)? {
        tracing::info!("Import declined, nothing written");
        return Ok(ImportOutcome::Declined { discarded });
    }

    let sink = open_sink().await?;
    let result = sink.persist(batch.survivors()).await;
    sink.close().await;

    match result {
        Ok(summary) => {
            writeln!(
                output,
                "Data added successfully: {} companies, {} phones.",
                summary.companies, summary.phones
            )?;
            Ok(ImportOutcome::Committed { discarded, summary })
        }
        Err(error) => {
            tracing::error!(error = %error, "Import rolled back");
            writeln!(output, "Write failed, transaction rolled back: {error}")?;
            Ok(ImportOutcome::RolledBack { discarded, error })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use regimport_core::dedup::DedupError;
    use regimport_core::validation::DatePolicy;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records every batch it is handed; optionally fails like a rollback.
    #[derive(Clone, Default)]
    struct RecordingSink {
        batches: Arc<Mutex<Vec<Vec<ValidatedRecord>>>>,
        closed: Arc<AtomicBool>,
        fail: bool,
    }

    #[async_trait]
    impl CompanySink for RecordingSink {
        async fn persist(
            &self,
            companies: &[ValidatedRecord],
        ) -> Result<BatchInsertSummary, PersistenceError> {
            if self.fail {
                return Err(PersistenceError::DuplicateRegistration {
                    registration_id: companies[0].registration_id.clone(),
                });
            }
            self.batches.lock().unwrap().push(companies.to_vec());
            Ok(BatchInsertSummary {
                companies: companies.len(),
                phones: companies.iter().map(|c| c.phones.len()).sum(),
            })
        }

        async fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn raw(reg: &str, tax: Option<&str>, date: &str) -> RawRecord {
        RawRecord {
            registration_id: Some(reg.to_string()),
            tax_id: tax.map(String::from),
            name: None,
            updated_on: Some(date.to_string()),
            phones: vec!["900".to_string()],
        }
    }

    /// Two versions of one company, one company missing its tax id, one
    /// with a short registration id, and one clean company.
    fn batch() -> Vec<RawRecord> {
        vec![
            raw("1111111111111", Some("2222222222"), "2023-01-01"),
            raw("1111111111111", Some("2222222222"), "2023-06-01"),
            raw("4444444444444", None, "2023-01-01"),
            raw("555555555555", Some("2222222222"), "2023-01-01"),
            raw("6666666666666", Some("7777777777"), "2022-02-02"),
        ]
    }

    async fn run(
        records: &[RawRecord],
        answer: &str,
        sink: &RecordingSink,
    ) -> (AppResult<ImportOutcome>, String) {
        let mut output = Vec::new();
        let opened = sink.clone();
        let result = run_import(
            records,
            &RecordValidator::default(),
            Cursor::new(answer.as_bytes().to_vec()),
            &mut output,
            || async move { Ok(opened) },
        )
        .await;
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn prepare_counts_invalid_and_duplicates() {
        let batch = prepare(&batch(), &RecordValidator::default()).unwrap();
        assert_eq!(batch.total, 5);
        assert_eq!(batch.valid, 3);
        assert_eq!(batch.dedup.dropped(), 1);
        assert_eq!(batch.discarded(), 3);

        let survivors = batch.survivors();
        assert_eq!(survivors.len(), 2);
        let kept = survivors
            .iter()
            .find(|r| r.registration_id == "1111111111111")
            .unwrap();
        assert_eq!(kept.updated_on, "2023-06-01");
    }

    #[test]
    fn demo_document_prepares() {
        let records = regimport_core::document::parse_companies(include_str!(
            "../../../demos/companies.xml"
        ))
        .unwrap();
        let batch = prepare(&records, &RecordValidator::default()).unwrap();

        assert_eq!(batch.total, 5);
        assert_eq!(batch.valid, 3);
        assert_eq!(batch.discarded(), 3);
        let ids: Vec<&str> = batch
            .survivors()
            .iter()
            .map(|r| r.registration_id.as_str())
            .collect();
        assert_eq!(ids, ["1027700132195", "1037739010891"]);
        assert_eq!(batch.survivors()[0].updated_on, "2023-06-01");
    }

    #[test]
    fn abort_policy_fails_on_malformed_date() {
        let records = vec![raw("1111111111111", Some("2222222222"), "2023/01/01")];
        let result = prepare(&records, &RecordValidator::new(DatePolicy::Abort));
        assert_matches!(
            result,
            Err(AppError::Core(CoreError::Dedup(DedupError::DateFormat { .. })))
        );
    }

    #[test]
    fn reject_policy_drops_malformed_date() {
        let records = vec![raw("1111111111111", Some("2222222222"), "2023/01/01")];
        let batch = prepare(&records, &RecordValidator::new(DatePolicy::Reject)).unwrap();
        assert!(batch.survivors().is_empty());
        assert_eq!(batch.discarded(), 1);
    }

    #[test]
    fn confirm_accepts_only_exact_y() {
        for (answer, expected) in [
            ("y\n", true),
            ("y\r\n", true),
            ("y", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
            ("yes\n", false),
            ("Y\n", false),
            (" y\n", false),
        ] {
            let mut output = Vec::new();
            let mut input = Cursor::new(answer.as_bytes());
            assert_eq!(
                confirm(0, &mut input, &mut output).unwrap(),
                expected,
                "answer {answer:?}"
            );
        }
    }

    #[tokio::test]
    async fn confirmed_run_persists_survivors() {
        let sink = RecordingSink::default();
        let (result, output) = run(&batch(), "y\n", &sink).await;

        let outcome = result.unwrap();
        assert_matches!(
            outcome,
            ImportOutcome::Committed {
                discarded: 3,
                summary: BatchInsertSummary { companies: 2, phones: 2 },
            }
        );
        assert!(output.starts_with("Number of invalid companies: 3\n"));
        assert!(output.contains("(y/n)"));
        assert!(output.ends_with("Data added successfully: 2 companies, 2 phones.\n"));

        let batches = sink.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
        assert!(sink.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn declined_run_never_opens_the_sink() {
        for answer in ["n\n", "", "yes\n"] {
            let mut output = Vec::new();
            let opened = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&opened);

            let outcome = run_import(
                &batch(),
                &RecordValidator::default(),
                Cursor::new(answer.as_bytes()),
                &mut output,
                || async move {
                    flag.store(true, Ordering::SeqCst);
                    Ok(RecordingSink::default())
                },
            )
            .await
            .unwrap();

            assert_matches!(outcome, ImportOutcome::Declined { discarded: 3 });
            assert!(!opened.load(Ordering::SeqCst), "answer {answer:?}");
            let output = String::from_utf8(output).unwrap();
            assert!(output.starts_with("Number of invalid companies: 3\n"));
        }
    }

    #[tokio::test]
    async fn failed_write_reports_rollback() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let (result, output) = run(&batch(), "y\n", &sink).await;

        let outcome = result.unwrap();
        assert_eq!(outcome.discarded(), 3);
        assert_matches!(
            outcome,
            ImportOutcome::RolledBack {
                error: PersistenceError::DuplicateRegistration { .. },
                ..
            }
        );
        assert!(output.contains("Write failed, transaction rolled back"));
        assert!(sink.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn sink_open_failure_propagates() {
        let mut output = Vec::new();
        let result = run_import(
            &batch(),
            &RecordValidator::default(),
            Cursor::new(b"y\n".as_slice()),
            &mut output,
            || async { Err::<RecordingSink, _>(AppError::Config("no database".into())) },
        )
        .await;
        assert_matches!(result, Err(AppError::Config(_)));
    }

    #[tokio::test]
    async fn distinct_valid_records_all_reach_the_sink() {
        let records = vec![
            raw("1111111111111", Some("2222222222"), "2023-01-01"),
            raw("3333333333333", Some("2222222222"), "2023-01-01"),
        ];
        let sink = RecordingSink::default();
        let (result, _) = run(&records, "y\n", &sink).await;

        assert_matches!(result.unwrap(), ImportOutcome::Committed { discarded: 0, .. });
        let batches = sink.batches.lock().unwrap();
        let mut ids: Vec<&str> = batches[0]
            .iter()
            .map(|r| r.registration_id.as_str())
            .collect();
        ids.sort();
        assert_eq!(ids, ["1111111111111", "3333333333333"]);
    }
}
