//! Repository for the `reservations` table.

use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use staybook_core::booking::NewReservation;
use staybook_core::day_range::DayRange;
use staybook_core::stay::{BookedWindow, StayWindow};
use staybook_core::types::{Day, DbId};

use crate::models::reservation::Reservation;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reference, unit_id, start_date, end_date, is_blocked, \
    guest_name, guest_phone, guest_email, guest_sex, client_type, guest_count, \
    nights, per_night, subtotal, service_fee, total, currency, notes, \
    created_at, updated_at";

#[derive(FromRow)]
struct WindowRow {
    id: DbId,
    start_date: Day,
    end_date: Day,
}

impl WindowRow {
    fn into_booked(self) -> Result<BookedWindow, sqlx::Error> {
        let window = StayWindow::new(self.start_date, self.end_date).map_err(|_| {
            sqlx::Error::Decode(
                format!("reservation {} has end_date before start_date", self.id).into(),
            )
        })?;
        Ok(BookedWindow {
            reservation_id: self.id,
            window,
        })
    }
}

/// Provides data access for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Reservations of a unit ordered by `start_date`, optionally limited to
    /// stays touching the inclusive range `days`.
    pub async fn list_by_unit(
        pool: &PgPool,
        unit_id: DbId,
        days: Option<DayRange>,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE unit_id = $1 \
               AND ($2::date IS NULL OR (start_date <= $3::date AND end_date >= $2::date)) \
             ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(unit_id)
            .bind(days.map(|d| d.start()))
            .bind(days.map(|d| d.end()))
            .fetch_all(pool)
            .await
    }

    /// Every `[start_date, end_date)` on a unit except `exclude_id`.
    pub async fn booked_windows<'e, E: PgExecutor<'e>>(
        executor: E,
        unit_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WindowRow>(
            "SELECT id, start_date, end_date FROM reservations \
             WHERE unit_id = $1 AND ($2::bigint IS NULL OR id <> $2) \
             ORDER BY start_date",
        )
        .bind(unit_id)
        .bind(exclude_id)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(WindowRow::into_booked).collect()
    }

    /// Read a reservation and hold its row lock for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Take a row lock on the unit for the rest of the transaction.
    ///
    /// Returns `None` if the unit does not exist.
    pub async fn lock_unit(
        conn: &mut PgConnection,
        unit_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM units WHERE id = $1 FOR UPDATE")
            .bind(unit_id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a validated reservation, returning the created row.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewReservation,
        reference: &str,
    ) -> Result<Reservation, sqlx::Error> {
        let guest = input.occupancy.guest_fields();
        let pricing = input.occupancy.pricing_fields();
        let query = format!(
            "INSERT INTO reservations (reference, unit_id, start_date, end_date, is_blocked, \
                guest_name, guest_phone, guest_email, guest_sex, client_type, guest_count, \
                nights, per_night, subtotal, service_fee, total, currency, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(reference)
            .bind(input.unit_id)
            .bind(input.window.start())
            .bind(input.window.end())
            .bind(input.occupancy.is_blocked())
            .bind(guest.guest_name)
            .bind(guest.guest_phone)
            .bind(guest.guest_email)
            .bind(guest.guest_sex)
            .bind(guest.client_type)
            .bind(guest.guest_count)
            .bind(pricing.nights)
            .bind(pricing.per_night)
            .bind(pricing.subtotal)
            .bind(pricing.service_fee)
            .bind(pricing.total)
            .bind(pricing.currency)
            .bind(&input.notes)
            .fetch_one(conn)
            .await
    }

    /// Overwrite every mutable column. `reference` and `created_at` never change.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &NewReservation,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let guest = input.occupancy.guest_fields();
        let pricing = input.occupancy.pricing_fields();
        let query = format!(
            "UPDATE reservations SET \
                unit_id = $2, start_date = $3, end_date = $4, is_blocked = $5, \
                guest_name = $6, guest_phone = $7, guest_email = $8, guest_sex = $9, \
                client_type = $10, guest_count = $11, \
                nights = $12, per_night = $13, subtotal = $14, service_fee = $15, \
                total = $16, currency = $17, notes = $18, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(input.unit_id)
            .bind(input.window.start())
            .bind(input.window.end())
            .bind(input.occupancy.is_blocked())
            .bind(guest.guest_name)
            .bind(guest.guest_phone)
            .bind(guest.guest_email)
            .bind(guest.guest_sex)
            .bind(guest.client_type)
            .bind(guest.guest_count)
            .bind(pricing.nights)
            .bind(pricing.per_night)
            .bind(pricing.subtotal)
            .bind(pricing.service_fee)
            .bind(pricing.total)
            .bind(pricing.currency)
            .bind(&input.notes)
            .fetch_optional(conn)
            .await
    }

    /// Permanently delete a reservation. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
