//! Persistence for imported companies and their phone numbers.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Name of the unique constraint on `company.registration_id`.
pub const UQ_COMPANY_REGISTRATION_ID: &str = "uq_company_registration_id";

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// A failed write. Any of these means the batch transaction was rolled back.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("company with registration id {registration_id} already exists")]
    DuplicateRegistration { registration_id: String },

    #[error("invalid company record: {0}")]
    InvalidRecord(#[from] regimport_core::error::CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PersistenceError {
    /// Classify a sqlx error raised while inserting the given company.
    pub(crate) fn from_insert(err: sqlx::Error, registration_id: i64) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(UQ_COMPANY_REGISTRATION_ID)
            {
                return Self::DuplicateRegistration {
                    registration_id: format!("{registration_id:013}"),
                };
            }
        }
        Self::Database(err)
    }
}

/// Create a connection pool.
pub async fn create_pool(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
