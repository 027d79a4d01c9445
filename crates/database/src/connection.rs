use crate::error::DbError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Establishes a connection pool to the SQLite database at `path`.
///
/// The database file is created on first run. Foreign keys are switched on
/// for every connection so the `reviews.book_id` reference is honoured.
pub async fn connect(path: impl AsRef<Path>) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::new()
        .filename(path.as_ref())
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    tracing::debug!(path = %path.as_ref().display(), "Opened SQLite pool.");
    Ok(pool)
}

/// Ensures the `books` and `reviews` tables exist.
///
/// Safe to call on every start: the migration ledger skips applied
/// migrations, and the DDL itself is `CREATE TABLE IF NOT EXISTS`, so a store
/// created without the ledger is left untouched as well.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
