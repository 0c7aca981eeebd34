//! PostgreSQL adapter for the store ports.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use staybook_core::availability::DaySetting;
use staybook_core::booking::NewReservation;
use staybook_core::day_range::DayRange;
use staybook_core::error::StoreError;
use staybook_core::stay::BookedWindow;
use staybook_core::types::{Day, DbId};

use crate::models::availability::AvailabilityOverride;
use crate::models::reservation::Reservation;
use crate::models::unit::{CreateUnit, Unit};
use crate::repositories::{AvailabilityRepo, ReservationRepo, UnitRepo};
use crate::store::{AvailabilityStore, ReservationStore, UnitStore, UnitWrite};
use crate::store_error;

/// Store backed by a PostgreSQL pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UnitStore for PgStore {
    async fn create_unit(&self, input: &CreateUnit) -> Result<Unit, StoreError> {
        UnitRepo::create(&self.pool, input).await.map_err(store_error)
    }

    async fn find_unit(&self, id: DbId) -> Result<Option<Unit>, StoreError> {
        UnitRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)
    }

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        UnitRepo::list(&self.pool).await.map_err(store_error)
    }

    async fn unit_exists(&self, id: DbId) -> Result<bool, StoreError> {
        UnitRepo::exists(&self.pool, id).await.map_err(store_error)
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn find_reservation(&self, id: DbId) -> Result<Option<Reservation>, StoreError> {
        ReservationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)
    }

    async fn list_reservations(
        &self,
        unit_id: DbId,
        days: Option<DayRange>,
    ) -> Result<Vec<Reservation>, StoreError> {
        ReservationRepo::list_by_unit(&self.pool, unit_id, days)
            .await
            .map_err(store_error)
    }

    async fn booked_windows(
        &self,
        unit_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, StoreError> {
        ReservationRepo::booked_windows(&self.pool, unit_id, exclude_id)
            .await
            .map_err(store_error)
    }

    async fn delete_reservation(&self, id: DbId) -> Result<bool, StoreError> {
        ReservationRepo::delete(&self.pool, id)
            .await
            .map_err(store_error)
    }

    async fn begin_unit_write(
        &self,
        unit_id: DbId,
    ) -> Result<Option<Box<dyn UnitWrite>>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let locked = ReservationRepo::lock_unit(&mut tx, unit_id)
            .await
            .map_err(store_error)?;
        if locked.is_none() {
            // Dropping `tx` rolls it back.
            return Ok(None);
        }
        Ok(Some(Box::new(PgUnitWrite {
            unit_id,
            tx: Some(tx),
        })))
    }
}

/// A transaction holding `FOR UPDATE` on one `units` row.
struct PgUnitWrite {
    unit_id: DbId,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitWrite {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, StoreError> {
        self.tx
            .as_mut()
            .ok_or_else(|| StoreError::backend("unit write section already committed"))
    }
}

#[async_trait]
impl UnitWrite for PgUnitWrite {
    fn unit_id(&self) -> DbId {
        self.unit_id
    }

    async fn find(&mut self, id: DbId) -> Result<Option<Reservation>, StoreError> {
        let tx = self.tx()?;
        ReservationRepo::find_for_update(tx, id)
            .await
            .map_err(store_error)
    }

    async fn booked_windows(
        &mut self,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, StoreError> {
        let unit_id = self.unit_id;
        let tx = self.tx()?;
        ReservationRepo::booked_windows(&mut **tx, unit_id, exclude_id)
            .await
            .map_err(store_error)
    }

    async fn insert(
        &mut self,
        reservation: &NewReservation,
        reference: &str,
    ) -> Result<Reservation, StoreError> {
        let tx = self.tx()?;
        ReservationRepo::insert(tx, reservation, reference)
            .await
            .map_err(store_error)
    }

    async fn update(
        &mut self,
        id: DbId,
        reservation: &NewReservation,
    ) -> Result<Option<Reservation>, StoreError> {
        let tx = self.tx()?;
        ReservationRepo::update(tx, id, reservation)
            .await
            .map_err(store_error)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        match self.tx.take() {
            Some(tx) => tx.commit().await.map_err(store_error),
            None => Err(StoreError::backend("unit write section already committed")),
        }
    }
}

#[async_trait]
impl AvailabilityStore for PgStore {
    async fn list_overrides(
        &self,
        unit_id: DbId,
        days: DayRange,
    ) -> Result<Vec<AvailabilityOverride>, StoreError> {
        AvailabilityRepo::list_range(&self.pool, unit_id, days)
            .await
            .map_err(store_error)
    }

    async fn upsert_override(
        &self,
        unit_id: DbId,
        date: Day,
        setting: &DaySetting,
    ) -> Result<AvailabilityOverride, StoreError> {
        AvailabilityRepo::upsert(&self.pool, unit_id, date, setting)
            .await
            .map_err(store_error)
    }

    async fn replace_range(
        &self,
        unit_id: DbId,
        days: DayRange,
        setting: &DaySetting,
    ) -> Result<u64, StoreError> {
        AvailabilityRepo::replace_range(&self.pool, unit_id, days, setting)
            .await
            .map_err(store_error)
    }

    async fn delete_override(&self, unit_id: DbId, date: Day) -> Result<bool, StoreError> {
        AvailabilityRepo::delete(&self.pool, unit_id, date)
            .await
            .map_err(store_error)
    }
}
