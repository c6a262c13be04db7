//! SQLite-based unified store using `SeaORM`.
//!
//! A single `SqliteStore` implements `DomainRepository`, `DeploymentRepository`
//! and `LandingPageRepository`, backed by a local `SQLite` database.

mod deployment_repo;
mod domain_repo;
pub(crate) mod entity;
mod landing_page_repo;
mod migration;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use launchpad_core::error::{CoreError, CoreResult};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use migration::Migrator;

/// SQLite-based store for every Launchpad record.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and bring its schema up to date.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        let store = Self { db };

        Migrator::up(&store.db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        Ok(store)
    }
}

/// Wrap a `DbErr` as a storage error naming the failed action.
pub(crate) fn db_error(action: &'static str) -> impl Fn(DbErr) -> CoreError {
    move |e| CoreError::StorageError(format!("Failed to {action}: {e}"))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(field: &str, raw: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {field}: {e}")))
}

/// Parse a unit-variant enum from its serde string form.
pub(crate) fn parse_enum<T: serde::de::DeserializeOwned>(field: &str, raw: String) -> CoreResult<T> {
    serde_json::from_value(serde_json::Value::String(raw))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {field}: {e}")))
}
