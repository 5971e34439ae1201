//! Database configuration module for the clinic agenda.
//!
//! This module resolves the database URL, opens the SeaORM connection pool and creates
//! the five clinic tables. Table creation uses `Schema::create_table_from_entity`, so the
//! schema (columns, unique constraints and foreign keys) always matches the entity
//! definitions without hand-written SQL.

use crate::entities::{Appointment, CashFlow, Insurance, Patient, Professional};
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Fallback database when neither `DATABASE_URL` nor the `DB_*` variables are set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/clinic_agenda.sqlite?mode=rwc";

/// Resolves the database URL from the environment.
///
/// Resolution order:
/// 1. `DATABASE_URL`
/// 2. a PostgreSQL URL composed from `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT`, `DB_NAME`
///    (only when `DB_HOST` is set)
/// 3. [`DEFAULT_DATABASE_URL`]
pub fn get_database_url() -> Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }

    if std::env::var("DB_HOST").is_ok() {
        return postgres_url_from_parts(|key| std::env::var(key).ok());
    }

    Ok(DEFAULT_DATABASE_URL.to_string())
}

/// Builds a PostgreSQL URL from the individual `DB_*` settings.
///
/// `lookup` abstracts the environment so the composition can be tested without
/// touching process-wide state. All five settings are required and `DB_PORT`
/// must be an integer.
pub fn postgres_url_from_parts<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    const REQUIRED: [&str; 5] = ["DB_USER", "DB_PASSWORD", "DB_HOST", "DB_PORT", "DB_NAME"];

    let missing: Vec<&str> = REQUIRED
        .iter()
        .copied()
        .filter(|key| lookup(key).is_none_or(|v| v.is_empty()))
        .collect();
    if !missing.is_empty() {
        return Err(Error::Config {
            message: format!("Missing database settings: {}", missing.join(", ")),
        });
    }

    let get = |key: &str| lookup(key).unwrap_or_default();
    let port: u16 = get("DB_PORT").parse().map_err(|_| Error::Config {
        message: format!("DB_PORT must be an integer, got '{}'", get("DB_PORT")),
    })?;

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        get("DB_USER"),
        get("DB_PASSWORD"),
        get("DB_HOST"),
        port,
        get("DB_NAME")
    ))
}

/// Directory that must exist before a file-backed SQLite URL can be opened.
fn sqlite_parent_dir(url: &str) -> Option<&std::path::Path> {
    let path = url.strip_prefix("sqlite://")?.split('?').next()?;
    std::path::Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Establishes a connection pool to the configured database.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to database");
    let db = Database::connect(&database_url).await?;
    info!(backend = ?db.get_database_backend(), "Database connection established");
    Ok(db)
}

/// Creates all clinic tables that do not exist yet.
///
/// Tables are created in foreign-key order: the three registries first, then
/// appointments, then the cash flow ledger that references appointments.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    create_table(db, Professional).await?;
    create_table(db, Patient).await?;
    create_table(db, Insurance).await?;
    create_table(db, Appointment).await?;
    create_table(db, CashFlow).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
