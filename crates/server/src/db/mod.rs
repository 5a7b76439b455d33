//! Database operations for the catalog `SQLite` store.
//!
//! ## Tables
//!
//! - `cafe` - One row per cafe, keyed by `id`, unique on `name`
//!
//! `id` is declared `AUTOINCREMENT` so that ids are never handed out twice,
//! even after the highest one is deleted.
//!
//! The schema is created on startup if it does not exist yet; there is no
//! migration history.

pub mod cafes;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

/// Schema applied at startup.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS cafe (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           VARCHAR(250) NOT NULL UNIQUE,
    map_url        VARCHAR(500) NOT NULL,
    img_url        VARCHAR(500) NOT NULL,
    location       VARCHAR(250) NOT NULL,
    seats          VARCHAR(250) NOT NULL,
    has_toilet     BOOLEAN NOT NULL,
    has_wifi       BOOLEAN NOT NULL,
    has_sockets    BOOLEAN NOT NULL,
    can_take_calls BOOLEAN NOT NULL,
    coffee_price   VARCHAR(250)
);
CREATE INDEX IF NOT EXISTS idx_cafe_location ON cafe (location);
";

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing. In-memory URLs get a single
/// connection, since every `:memory:` connection is a separate database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let in_memory = url.contains(":memory:");

    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));
    let options = if in_memory {
        options
    } else {
        options.journal_mode(SqliteJournalMode::Wal)
    };

    SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 10 })
        .acquire_timeout(Duration::from_secs(10))
        // Keep the single in-memory connection (and its data) alive.
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Create the catalog tables if they do not exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if a statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}
