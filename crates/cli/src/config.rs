use std::path::PathBuf;

use regimport_core::document::DEFAULT_DOCUMENT_NAME;
use regimport_core::validation::DatePolicy;
use sqlx::postgres::PgConnectOptions;

use crate::error::{AppError, AppResult};

/// Database connection settings.
///
/// Defaults match a local development server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    /// Full connection URL; takes precedence over the individual parts.
    pub database_url: Option<String>,
    /// Pool size (default: `1`, the import is single-threaded).
    pub max_connections: u32,
}

impl DbConfig {
    /// Load database settings from environment variables with defaults.
    ///
    /// | Env Var              | Default            |
    /// |----------------------|--------------------|
    /// | `DB_USER`            | `superuser`        |
    /// | `DB_PASSWORD`        | `1234`             |
    /// | `DB_HOST`            | `localhost`        |
    /// | `DB_PORT`            | `5432`             |
    /// | `DB_NAME`            | `company_from_xml` |
    /// | `DATABASE_URL`       | unset              |
    /// | `DB_MAX_CONNECTIONS` | `1`                |
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            user: var("DB_USER", "superuser"),
            password: var("DB_PASSWORD", "1234"),
            host: var("DB_HOST", "localhost"),
            port: parse_var("DB_PORT", &var("DB_PORT", "5432"))?,
            database_name: var("DB_NAME", "company_from_xml"),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: parse_var("DB_MAX_CONNECTIONS", &var("DB_MAX_CONNECTIONS", "1"))?,
        })
    }

    /// Connection string assembled from the individual settings, or the
    /// explicit `DATABASE_URL` if one was given.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database_name
            ),
        }
    }

    /// Connection options for the pool.
    ///
    /// Built field by field unless `DATABASE_URL` is set, so credentials do
    /// not need URL escaping.
    pub fn connect_options(&self) -> AppResult<PgConnectOptions> {
        match &self.database_url {
            Some(url) => url
                .parse()
                .map_err(|e| AppError::Config(format!("DATABASE_URL is invalid: {e}"))),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database_name)),
        }
    }

    /// `host:port/database` for log lines; never includes credentials.
    pub fn display_target(&self) -> String {
        match &self.database_url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.database_name),
        }
    }
}

/// Settings for one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Register export to read (default: `companies.xml` in the working directory).
    pub companies_file: PathBuf,
    /// Handling of malformed update dates (default: `reject`).
    pub date_policy: DatePolicy,
    pub db: DbConfig,
}

impl ImportConfig {
    /// Load the run configuration from environment variables with defaults.
    ///
    /// | Env Var          | Default         |
    /// |------------------|-----------------|
    /// | `COMPANIES_FILE` | `companies.xml` |
    /// | `DATE_POLICY`    | `reject`        |
    ///
    /// Database variables are documented on [`DbConfig::from_env`].
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let companies_file = lookup("COMPANIES_FILE")
            .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string())
            .into();

        let date_policy = match lookup("DATE_POLICY") {
            Some(value) => value
                .parse()
                .map_err(|e| AppError::Config(format!("DATE_POLICY: {e}")))?,
            None => DatePolicy::default(),
        };

        Ok(Self {
            companies_file,
            date_policy,
            db: DbConfig::from_lookup(&lookup)?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{key} must be a number, got '{value}'")))
}
