use regimport_core::error::CoreError;
use regimport_db::PersistenceError;

/// Application-level error type for the import run.
///
/// Wraps [`CoreError`] for domain failures and adds the ones that only
/// exist once configuration, the database and the terminal are involved.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `regimport_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A database error from sqlx outside the batch write.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migrations could not be applied.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The batch write failed and was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Reading the confirmation or writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for fallible application functions.
pub type AppResult<T> = Result<T, AppError>;
