//! Data-access ports.
//!
//! The API layer only talks to these traits. Adapters: [`crate::postgres`]
//! for production and [`crate::memory`] for local runs and tests.

use async_trait::async_trait;
use staybook_core::availability::DaySetting;
use staybook_core::booking::NewReservation;
use staybook_core::day_range::DayRange;
use staybook_core::error::StoreError;
use staybook_core::stay::BookedWindow;
use staybook_core::types::{Day, DbId};

use crate::models::availability::AvailabilityOverride;
use crate::models::reservation::Reservation;
use crate::models::unit::{CreateUnit, Unit};

#[async_trait]
pub trait UnitStore: Send + Sync {
    async fn create_unit(&self, input: &CreateUnit) -> Result<Unit, StoreError>;

    async fn find_unit(&self, id: DbId) -> Result<Option<Unit>, StoreError>;

    /// All units, newest first.
    async fn list_units(&self) -> Result<Vec<Unit>, StoreError>;

    async fn unit_exists(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn find_reservation(&self, id: DbId) -> Result<Option<Reservation>, StoreError>;

    /// Reservations of a unit ordered by `start_date`.
    ///
    /// With `days`, only stays touching that inclusive range are returned
    /// (`start_date <= days.end AND end_date >= days.start`).
    async fn list_reservations(
        &self,
        unit_id: DbId,
        days: Option<DayRange>,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Windows of every reservation on a unit, minus `exclude_id`.
    async fn booked_windows(
        &self,
        unit_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, StoreError>;

    /// Returns `true` if a row was removed.
    async fn delete_reservation(&self, id: DbId) -> Result<bool, StoreError>;

    /// Open a write section on `unit_id`.
    ///
    /// Reservation writers on the same unit are serialized until the section
    /// commits or is dropped; dropping without [`UnitWrite::commit`] discards
    /// every change made through it. Returns `None` if the unit does not exist.
    async fn begin_unit_write(&self, unit_id: DbId)
        -> Result<Option<Box<dyn UnitWrite>>, StoreError>;
}

/// Serialized reservation writes on one unit. See [`ReservationStore::begin_unit_write`].
#[async_trait]
pub trait UnitWrite: Send {
    fn unit_id(&self) -> DbId;

    /// Current state of reservation `id` as seen inside the section. The row
    /// cannot change under the section until it commits or is dropped.
    async fn find(&mut self, id: DbId) -> Result<Option<Reservation>, StoreError>;

    /// Same as [`ReservationStore::booked_windows`], read inside the section.
    async fn booked_windows(
        &mut self,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, StoreError>;

    async fn insert(
        &mut self,
        reservation: &NewReservation,
        reference: &str,
    ) -> Result<Reservation, StoreError>;

    /// Overwrite every mutable column of `id`. `None` if the row is gone.
    async fn update(
        &mut self,
        id: DbId,
        reservation: &NewReservation,
    ) -> Result<Option<Reservation>, StoreError>;

    /// Make the section's writes visible and release the unit.
    async fn commit(&mut self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// Overrides of `unit_id` whose date falls in `days`, ordered by date.
    async fn list_overrides(
        &self,
        unit_id: DbId,
        days: DayRange,
    ) -> Result<Vec<AvailabilityOverride>, StoreError>;

    /// Insert or overwrite the override keyed by `(unit_id, date)`.
    async fn upsert_override(
        &self,
        unit_id: DbId,
        date: Day,
        setting: &DaySetting,
    ) -> Result<AvailabilityOverride, StoreError>;

    /// Atomically replace every override in `days` with a fresh row built
    /// from `setting`. On error nothing in the range has changed.
    ///
    /// Returns the number of rows written.
    async fn replace_range(
        &self,
        unit_id: DbId,
        days: DayRange,
        setting: &DaySetting,
    ) -> Result<u64, StoreError>;

    /// Returns `true` if a row was removed.
    async fn delete_override(&self, unit_id: DbId, date: Day) -> Result<bool, StoreError>;
}
