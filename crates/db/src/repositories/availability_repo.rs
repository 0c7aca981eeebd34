//! Repository for the `availability_overrides` table.
//!
//! One row per `(unit_id, date)`; missing rows mean "available at the
//! unit's default price".

use sqlx::PgPool;
use staybook_core::availability::DaySetting;
use staybook_core::day_range::DayRange;
use staybook_core::types::{Day, DbId};

use crate::models::availability::AvailabilityOverride;

/// Column list for the `availability_overrides` table.
const COLUMNS: &str = "id, unit_id, date, is_available, custom_price, notes, created_at, updated_at";

/// Provides data access for per-day availability overrides.
pub struct AvailabilityRepo;

impl AvailabilityRepo {
    /// Overrides for `unit_id` with `date` inside `days` (inclusive), by date.
    pub async fn list_range(
        pool: &PgPool,
        unit_id: DbId,
        days: DayRange,
    ) -> Result<Vec<AvailabilityOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availability_overrides \
             WHERE unit_id = $1 AND date BETWEEN $2 AND $3 \
             ORDER BY date"
        );
        sqlx::query_as::<_, AvailabilityOverride>(&query)
            .bind(unit_id)
            .bind(days.start())
            .bind(days.end())
            .fetch_all(pool)
            .await
    }

    /// Upsert a single day's override.
    pub async fn upsert(
        pool: &PgPool,
        unit_id: DbId,
        date: Day,
        setting: &DaySetting,
    ) -> Result<AvailabilityOverride, sqlx::Error> {
        let query = format!(
            "INSERT INTO availability_overrides (unit_id, date, is_available, custom_price, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (unit_id, date) \
             DO UPDATE SET is_available = EXCLUDED.is_available, \
                           custom_price = EXCLUDED.custom_price, \
                           notes = EXCLUDED.notes, \
                           updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AvailabilityOverride>(&query)
            .bind(unit_id)
            .bind(date)
            .bind(setting.is_available)
            .bind(setting.custom_price)
            .bind(&setting.notes)
            .fetch_one(pool)
            .await
    }

    /// Delete every override in `days` and insert one fresh row per day,
    /// within a single transaction.
    ///
    /// Returns the number of rows inserted.
    pub async fn replace_range(
        pool: &PgPool,
        unit_id: DbId,
        days: DayRange,
        setting: &DaySetting,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM availability_overrides \
             WHERE unit_id = $1 AND date BETWEEN $2 AND $3",
        )
        .bind(unit_id)
        .bind(days.start())
        .bind(days.end())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let inserted = sqlx::query(
            "INSERT INTO availability_overrides (unit_id, date, is_available, custom_price, notes) \
             SELECT $1, d::date, $4, $5, $6 \
             FROM generate_series($2::date, $3::date, INTERVAL '1 day') AS d",
        )
        .bind(unit_id)
        .bind(days.start())
        .bind(days.end())
        .bind(setting.is_available)
        .bind(setting.custom_price)
        .bind(&setting.notes)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        tracing::debug!(unit_id, removed, inserted, "Replaced availability range");
        Ok(inserted)
    }

    /// Delete one day's override. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, unit_id: DbId, date: Day) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM availability_overrides WHERE unit_id = $1 AND date = $2")
                .bind(unit_id)
                .bind(date)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
