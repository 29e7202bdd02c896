use std::process::ExitCode;

use regimport::config::{DbConfig, ImportConfig};
use regimport::error::AppResult;
use regimport::orchestrator::{run_import, ImportOutcome};
use regimport::sink::PgCompanySink;
use regimport_core::document::load_companies;
use regimport_core::error::CoreError;
use regimport_core::validation::RecordValidator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // Logs go to stderr; stdout carries the count and the prompt.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "regimport=info,regimport_core=info,regimport_db=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(ImportOutcome::Declined { .. } | ImportOutcome::Committed { .. }) => ExitCode::SUCCESS,
        Ok(ImportOutcome::RolledBack { .. }) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, "Import failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<ImportOutcome> {
    // --- Configuration ---
    let config = ImportConfig::from_env()?;
    tracing::info!(
        file = %config.companies_file.display(),
        date_policy = config.date_policy.as_str(),
        database = %config.db.display_target(),
        "Loaded import configuration"
    );

    // --- Document ---
    let records = load_companies(&config.companies_file).map_err(CoreError::from)?;
    let validator = RecordValidator::new(config.date_policy);

    // --- Import ---
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_import(&records, &validator, stdin.lock(), &mut stdout, || {
        open_database(&config.db)
    })
    .await
}

/// Connect, check and migrate the database.
async fn open_database(db: &DbConfig) -> AppResult<PgCompanySink> {
    let pool = regimport_db::create_pool(db.connect_options()?, db.max_connections).await?;
    tracing::info!(database = %db.display_target(), "Database connection pool created");

    let ready = async {
        regimport_db::health_check(&pool).await?;
        tracing::info!("Database health check passed");
        regimport_db::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
        AppResult::Ok(())
    }
    .await;

    if let Err(err) = ready {
        pool.close().await;
        return Err(err);
    }
    Ok(PgCompanySink::new(pool))
}
