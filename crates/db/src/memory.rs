//! In-process adapter for the store ports.
//!
//! All state sits behind one async mutex. A unit write section holds that
//! mutex for its whole lifetime and works on a scratch copy, so dropping the
//! section without committing leaves the store untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use staybook_core::availability::DaySetting;
use staybook_core::booking::NewReservation;
use staybook_core::day_range::DayRange;
use staybook_core::error::StoreError;
use staybook_core::stay::BookedWindow;
use staybook_core::types::{Day, DbId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::availability::AvailabilityOverride;
use crate::models::reservation::Reservation;
use crate::models::unit::{CreateUnit, Unit};
use crate::store::{AvailabilityStore, ReservationStore, UnitStore, UnitWrite};

/// Constraint name reported when two reservations share a reference.
pub const RESERVATION_REFERENCE_KEY: &str = "uq_reservations_reference";

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: DbId,
    units: BTreeMap<DbId, Unit>,
    reservations: BTreeMap<DbId, Reservation>,
    overrides: BTreeMap<(DbId, Day), AvailabilityOverride>,
    /// One-shot: the next range replace fails after writing this many days.
    fail_range_write_after: Option<usize>,
}

impl MemoryState {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn booked_windows(
        &self,
        unit_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, StoreError> {
        let mut windows = self
            .reservations
            .values()
            .filter(|r| r.unit_id == unit_id && Some(r.id) != exclude_id)
            .map(|r| {
                let window = r.window().map_err(StoreError::backend)?;
                Ok(BookedWindow {
                    reservation_id: r.id,
                    window,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        windows.sort_by_key(|b| b.window.start());
        Ok(windows)
    }

    fn ensure_unit(&self, unit_id: DbId) -> Result<(), StoreError> {
        if self.units.contains_key(&unit_id) {
            Ok(())
        } else {
            Err(StoreError::backend(format!(
                "unit {unit_id} does not exist"
            )))
        }
    }

    fn ensure_reference_free(&self, reference: &str) -> Result<(), StoreError> {
        if self.reservations.values().any(|r| r.reference == reference) {
            return Err(StoreError::UniqueViolation {
                constraint: RESERVATION_REFERENCE_KEY.to_string(),
            });
        }
        Ok(())
    }

    fn put_override(
        &mut self,
        unit_id: DbId,
        date: Day,
        setting: &DaySetting,
    ) -> AvailabilityOverride {
        let now = Utc::now();
        let (id, created_at) = match self.overrides.get(&(unit_id, date)) {
            Some(existing) => (existing.id, existing.created_at),
            None => (self.next_id(), now),
        };
        let row = AvailabilityOverride {
            id,
            unit_id,
            date,
            is_available: setting.is_available,
            custom_price: setting.custom_price,
            notes: setting.notes.clone(),
            created_at,
            updated_at: now,
        };
        self.overrides.insert((unit_id, date), row.clone());
        row
    }
}

/// Store kept entirely in memory. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next [`AvailabilityStore::replace_range`] fail once `days`
    /// days have been written. The failed call leaves nothing behind.
    pub async fn fail_range_writes_after(&self, days: usize) {
        self.state.lock().await.fail_range_write_after = Some(days);
    }
}

#[async_trait]
impl UnitStore for MemoryStore {
    async fn create_unit(&self, input: &CreateUnit) -> Result<Unit, StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let unit = Unit {
            id: state.next_id(),
            name: input.name.trim().to_string(),
            nightly_price: input.nightly_price,
            currency: input.currency.clone(),
            max_guests: input.max_guests,
            created_at: now,
            updated_at: now,
        };
        state.units.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn find_unit(&self, id: DbId) -> Result<Option<Unit>, StoreError> {
        Ok(self.state.lock().await.units.get(&id).cloned())
    }

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.units.values().rev().cloned().collect())
    }

    async fn unit_exists(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.units.contains_key(&id))
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_reservation(&self, id: DbId) -> Result<Option<Reservation>, StoreError> {
        Ok(self.state.lock().await.reservations.get(&id).cloned())
    }

    async fn list_reservations(
        &self,
        unit_id: DbId,
        days: Option<DayRange>,
    ) -> Result<Vec<Reservation>, StoreError> {
        let state = self.state.lock().await;
        let mut rows: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.unit_id == unit_id)
            .filter(|r| {
                days.map_or(true, |d| r.start_date <= d.end() && r.end_date >= d.start())
            })
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.start_date, r.id));
        Ok(rows)
    }

    async fn booked_windows(
        &self,
        unit_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, StoreError> {
        self.state.lock().await.booked_windows(unit_id, exclude_id)
    }

    async fn delete_reservation(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.reservations.remove(&id).is_some())
    }

    async fn begin_unit_write(
        &self,
        unit_id: DbId,
    ) -> Result<Option<Box<dyn UnitWrite>>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        if !guard.units.contains_key(&unit_id) {
            return Ok(None);
        }
        let scratch = (*guard).clone();
        Ok(Some(Box::new(MemoryUnitWrite {
            unit_id,
            guard,
            scratch,
            committed: false,
        })))
    }
}

/// Holds the store mutex until dropped; writes land in `scratch`.
struct MemoryUnitWrite {
    unit_id: DbId,
    guard: OwnedMutexGuard<MemoryState>,
    scratch: MemoryState,
    committed: bool,
}

impl MemoryUnitWrite {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.committed {
            return Err(StoreError::backend("unit write section already committed"));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitWrite for MemoryUnitWrite {
    fn unit_id(&self) -> DbId {
        self.unit_id
    }

    async fn find(&mut self, id: DbId) -> Result<Option<Reservation>, StoreError> {
        self.ensure_open()?;
        Ok(self.scratch.reservations.get(&id).cloned())
    }

    async fn booked_windows(
        &mut self,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<BookedWindow>, StoreError> {
        self.ensure_open()?;
        self.scratch.booked_windows(self.unit_id, exclude_id)
    }

    async fn insert(
        &mut self,
        reservation: &NewReservation,
        reference: &str,
    ) -> Result<Reservation, StoreError> {
        self.ensure_open()?;
        let state = &mut self.scratch;
        state.ensure_unit(reservation.unit_id)?;
        state.ensure_reference_free(reference)?;

        let now = Utc::now();
        let row = to_row(state.next_id(), reference.to_string(), reservation, now, now);
        state.reservations.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &mut self,
        id: DbId,
        reservation: &NewReservation,
    ) -> Result<Option<Reservation>, StoreError> {
        self.ensure_open()?;
        let state = &mut self.scratch;
        state.ensure_unit(reservation.unit_id)?;
        let Some(current) = state.reservations.get(&id) else {
            return Ok(None);
        };

        let row = to_row(
            id,
            current.reference.clone(),
            reservation,
            current.created_at,
            Utc::now(),
        );
        state.reservations.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        *self.guard = std::mem::take(&mut self.scratch);
        self.committed = true;
        Ok(())
    }
}

fn to_row(
    id: DbId,
    reference: String,
    input: &NewReservation,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> Reservation {
    let guest = input.occupancy.guest_fields();
    let pricing = input.occupancy.pricing_fields();
    Reservation {
        id,
        reference,
        unit_id: input.unit_id,
        start_date: input.window.start(),
        end_date: input.window.end(),
        is_blocked: input.occupancy.is_blocked(),
        guest_name: guest.guest_name,
        guest_phone: guest.guest_phone,
        guest_email: guest.guest_email,
        guest_sex: guest.guest_sex,
        client_type: guest.client_type,
        guest_count: guest.guest_count,
        nights: pricing.nights,
        per_night: pricing.per_night,
        subtotal: pricing.subtotal,
        service_fee: pricing.service_fee,
        total: pricing.total,
        currency: pricing.currency,
        notes: input.notes.clone(),
        created_at,
        updated_at,
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn list_overrides(
        &self,
        unit_id: DbId,
        days: DayRange,
    ) -> Result<Vec<AvailabilityOverride>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .overrides
            .range((unit_id, days.start())..=(unit_id, days.end()))
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn upsert_override(
        &self,
        unit_id: DbId,
        date: Day,
        setting: &DaySetting,
    ) -> Result<AvailabilityOverride, StoreError> {
        let mut state = self.state.lock().await;
        state.ensure_unit(unit_id)?;
        Ok(state.put_override(unit_id, date, setting))
    }

    async fn replace_range(
        &self,
        unit_id: DbId,
        days: DayRange,
        setting: &DaySetting,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        state.ensure_unit(unit_id)?;
        let fail_after = state.fail_range_write_after.take();

        let mut scratch = state.clone();
        scratch
            .overrides
            .retain(|(unit, date), _| *unit != unit_id || !days.contains(*date));

        let mut written = 0u64;
        for (i, date) in days.days().enumerate() {
            if fail_after == Some(i) {
                return Err(StoreError::backend(format!(
                    "injected failure after {i} of {} days",
                    days.day_count()
                )));
            }
            // A fresh row, not an upsert: the old one is already gone.
            let now = Utc::now();
            let id = scratch.next_id();
            scratch.overrides.insert(
                (unit_id, date),
                AvailabilityOverride {
                    id,
                    unit_id,
                    date,
                    is_available: setting.is_available,
                    custom_price: setting.custom_price,
                    notes: setting.notes.clone(),
                    created_at: now,
                    updated_at: now,
                },
            );
            written += 1;
        }

        *state = scratch;
        Ok(written)
    }

    async fn delete_override(&self, unit_id: DbId, date: Day) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.overrides.remove(&(unit_id, date)).is_some())
    }
}
