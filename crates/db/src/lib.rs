//! Persistence for staybook.
//!
//! [`store`] defines the data-access ports the API layer depends on.
//! [`postgres`] implements them on top of the zero-sized repositories in
//! [`repositories`]; [`memory`] implements them in-process for local runs
//! and tests.

use sqlx::postgres::PgPoolOptions;
use staybook_core::error::StoreError;

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply every pending migration from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Translate a sqlx error into the store taxonomy.
///
/// PostgreSQL unique violations (SQLSTATE 23505) keep their constraint name
/// so callers can report which key collided.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::UniqueViolation {
                constraint: db_err.constraint().unwrap_or("unknown").to_string(),
            };
        }
    }
    StoreError::backend(err)
}
