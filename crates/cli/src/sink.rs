//! Where surviving records are written.

use async_trait::async_trait;
use regimport_core::record::ValidatedRecord;
use regimport_db::models::company::NewCompany;
use regimport_db::repositories::{BatchInsertSummary, CompanyRepo};
use regimport_db::{DbPool, PersistenceError};

/// Destination for a deduplicated batch.
///
/// A call either stores every record or none of them.
#[async_trait]
pub trait CompanySink {
    async fn persist(
        &self,
        companies: &[ValidatedRecord],
    ) -> Result<BatchInsertSummary, PersistenceError>;

    /// Release held connections. Called once the batch is done, whatever
    /// its outcome.
    async fn close(&self) {}
}

/// Writes batches to the `company` and `phone` tables.
pub struct PgCompanySink {
    pool: DbPool,
}

impl PgCompanySink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanySink for PgCompanySink {
    async fn persist(
        &self,
        companies: &[ValidatedRecord],
    ) -> Result<BatchInsertSummary, PersistenceError> {
        let rows = companies
            .iter()
            .map(NewCompany::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        CompanyRepo::insert_batch(&self.pool, &rows).await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Database pool closed");
    }
}
