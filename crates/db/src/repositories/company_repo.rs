//! Repository for the `company` table.

use regimport_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, NewCompany};
use crate::repositories::PhoneRepo;
use crate::PersistenceError;

/// Column list shared across queries. NUMERIC keys are cast so they decode
/// into `i64` without a decimal type.
const COLUMNS: &str = "id, registration_id::BIGINT AS registration_id, \
    tax_id::BIGINT AS tax_id, name, updated_on, created_at";

/// Rows written by a committed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchInsertSummary {
    pub companies: usize,
    pub phones: usize,
}

pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert every company and its phones in a single transaction.
    ///
    /// Either the whole batch is committed or nothing is: on the first
    /// failure the transaction is rolled back and the error returned. A
    /// registration id that already exists fails the batch with
    /// [`PersistenceError::DuplicateRegistration`].
    pub async fn insert_batch(
        pool: &PgPool,
        companies: &[NewCompany],
    ) -> Result<BatchInsertSummary, PersistenceError> {
        let mut tx = pool.begin().await?;

        match Self::insert_all(&mut tx, companies).await {
            Ok(summary) => {
                tx.commit().await?;
                tracing::info!(
                    companies = summary.companies,
                    phones = summary.phones,
                    "Company batch committed"
                );
                Ok(summary)
            }
            Err(err) => {
                tracing::error!(error = %err, "Company batch failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn insert_all(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        companies: &[NewCompany],
    ) -> Result<BatchInsertSummary, PersistenceError> {
        let mut summary = BatchInsertSummary::default();

        for company in companies {
            let company_id = sqlx::query_scalar::<_, DbId>(
                "INSERT INTO company (registration_id, tax_id, name, updated_on) \
                 VALUES ($1::NUMERIC(13, 0), $2::NUMERIC(10, 0), $3, $4) \
                 RETURNING id",
            )
            .bind(company.registration_id)
            .bind(company.tax_id)
            .bind(&company.name)
            .bind(company.updated_on)
            .fetch_one(&mut **tx)
            .await
            .map_err(|err| PersistenceError::from_insert(err, company.registration_id))?;

            for phone in &company.phones {
                PhoneRepo::create_in_tx(tx, company_id, phone).await?;
            }

            summary.companies += 1;
            summary.phones += company.phones.len();
        }

        Ok(summary)
    }

    /// Find a company by its registration id.
    pub async fn find_by_registration_id(
        pool: &PgPool,
        registration_id: i64,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM company WHERE registration_id = $1::NUMERIC");
        sqlx::query_as::<_, Company>(&query)
            .bind(registration_id)
            .fetch_optional(pool)
            .await
    }

    /// List all companies ordered by registration id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM company ORDER BY registration_id");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM company")
            .fetch_one(pool)
            .await
    }
}
