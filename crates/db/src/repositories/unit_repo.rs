//! Repository for the `units` table.

use sqlx::PgPool;
use staybook_core::types::DbId;

use crate::models::unit::{CreateUnit, Unit};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, nightly_price, currency, max_guests, created_at, updated_at";

/// Provides CRUD operations for units.
pub struct UnitRepo;

impl UnitRepo {
    /// Insert a new unit, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUnit) -> Result<Unit, sqlx::Error> {
        let query = format!(
            "INSERT INTO units (name, nightly_price, currency, max_guests)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(input.name.trim())
            .bind(input.nightly_price)
            .bind(&input.currency)
            .bind(input.max_guests)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units WHERE id = $1");
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all units, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Unit>(&query).fetch_all(pool).await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM units WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
